//! Human-readable schedule reports.

use serde::Serialize;

use gridsched_orchestrator::Schedule;

/// Everything `gridsched run` prints, in either format.
#[derive(Debug, Serialize)]
pub struct Report {
    pub scenario: String,
    /// Private heuristic first, public one second for hybrid runs.
    pub heuristics: Vec<&'static str>,
    pub interval: f64,
    pub schedule: Schedule,
}

pub fn format_report(report: &Report) -> String {
    let schedule = &report.schedule;
    let mut out = String::new();

    out.push_str("\n╔══════════════════════════════════════════╗\n");
    out.push_str("║  gridsched Schedule Report               ║\n");
    out.push_str("╠══════════════════════════════════════════╣\n");
    out.push_str(&format!("║  Scenario:  {:<28}║\n", report.scenario));
    out.push_str(&format!("║  Heuristic: {:<28}║\n", report.heuristics.join(" + ")));
    out.push_str(&format!("║  Interval:  {:<28}║\n", report.interval));
    out.push_str("╚══════════════════════════════════════════╝\n\n");

    let total = schedule.scheduled.len() + schedule.unscheduled.len();
    out.push_str(&format!("Tasks ({total} total):\n"));
    out.push_str(&format!("  ✅ {} scheduled\n", schedule.assigned_count()));
    out.push_str(&format!("  ❌ {} unscheduled\n\n", schedule.unscheduled.len()));

    out.push_str(&format!("  Makespan:  {}\n", schedule.makespan));
    out.push_str(&format!("  Cost:      {:.2}\n\n", schedule.total_cost));

    if !schedule.windows.is_empty() {
        out.push_str("WINDOWS:\n\n");
        out.push_str("  end        submitted  scheduled  unscheduled  rescheduled  provisioned\n");
        for w in &schedule.windows {
            out.push_str(&format!(
                "  {:<10} {:<10} {:<10} {:<12} {:<12} {}\n",
                w.window_end, w.submitted, w.scheduled, w.unscheduled, w.rescheduled, w.provisioned
            ));
        }
        out.push('\n');
    }

    out.push_str("RESOURCES:\n\n");
    for (id, tasks) in schedule.load_by_resource() {
        let Some(resource) = schedule.resources.iter().find(|r| r.id == id) else {
            continue;
        };
        let class = resource
            .class
            .as_ref()
            .map(|c| format!(" [{}]", c.name))
            .unwrap_or_default();
        out.push_str(&format!(
            "  • {id}{class}  speed {}  tasks {tasks}  cost {:.2}\n",
            resource.speed, resource.cost
        ));
    }
    out.push('\n');

    if !schedule.assignments.is_empty() {
        out.push_str("ASSIGNMENTS:\n\n");
        for a in &schedule.assignments {
            let resource = a
                .resource_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "  task {} → resource {resource} at {}\n",
                a.task_id, a.scheduled_start
            ));
        }
        out.push('\n');
    }

    if !schedule.unscheduled.is_empty() {
        out.push_str("❌ UNSCHEDULED:\n\n");
        for task in &schedule.unscheduled {
            let deadline = task
                .deadline
                .map(|d| format!(", deadline {d}"))
                .unwrap_or_default();
            out.push_str(&format!(
                "  • task {} (length {}, arrival {}{deadline})\n",
                task.id, task.length, task.arrival
            ));
        }
    }

    out
}
