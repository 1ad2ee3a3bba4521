use std::time::Duration;

pub fn sleep(ms: u32) {
    std::thread::sleep(Duration::from_millis(ms as u64));
}

/// `count` evenly spaced values from `start` to `end` inclusive, truncated toward zero.
pub fn linspace_i32(start: i32, end: i32, count: usize) -> Vec<i32> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) as f64 / (count - 1) as f64;
            (0..count)
                .map(|i| (start as f64 + step * i as f64) as i32)
                .collect()
        },
    }
}

pub fn press_any_key_to_continue() {
    let term = console::Term::stdout();
    let _ = term.write_line("按任意键继续...");
    let _ = term.read_key();
}
