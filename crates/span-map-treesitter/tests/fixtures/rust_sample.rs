// A small sample used by the structure tests.

struct Point {
    x: i32,
    y: i32,
}

fn length(p: &Point) -> f64 {
    let dx = p.x as f64;
    let dy = p.y as f64;
    (dx * dx + dy * dy).sqrt()
}
