//! Arrival-ordered window replay.

use gridsched_core::Task;

/// Sort `tasks` by arrival (stable) and feed them to `run` one window at
/// a time, together with the window's end time.
///
/// Each task is stamped with `scheduled_start = window_end` of the window
/// it lands in. A window is flushed when the next task arrives strictly
/// after its end; the last window is always flushed, even when empty.
/// `interval` must be positive.
pub fn replay_windows<F>(mut tasks: Vec<Task>, interval: f64, mut run: F)
where
    F: FnMut(Vec<Task>, f64),
{
    tasks.sort_by(|a, b| a.arrival.total_cmp(&b.arrival));

    let mut window_end = interval;
    let mut window = Vec::new();

    for mut task in tasks {
        if task.arrival > window_end {
            run(std::mem::take(&mut window), window_end);
            window_end = window_end.max((task.arrival / interval).ceil() * interval);
            while task.arrival > window_end {
                window_end += interval;
            }
        }
        task.scheduled_start = window_end;
        window.push(task);
    }

    run(window, window_end);
}
