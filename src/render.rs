//! Terminal render sink — stands in for the out-of-scope map renderer.
//!
//! Exercises the two consumption contracts: the store's collection
//! snapshot (with the status-to-color mapping) and the editor's live
//! capture session (point list, preview polygon, connecting segments).

use terramark_core::Territory;
use terramark_editor::CaptureSession;

pub fn draw_collection(territories: &[Territory]) {
    if territories.is_empty() {
        println!("(no territories)");
        return;
    }
    for t in territories {
        println!(
            "  {:<24} {:>2} pts  {:<10} {}  {}",
            t.name,
            t.boundary.len(),
            t.status.as_str(),
            t.status.border_color(),
            t.price
        );
    }
}

pub fn draw_session(session: &CaptureSession) {
    let polygon = match session.preview() {
        Some(points) => format!("preview polygon ({} vertices)", points.len()),
        None => "no polygon yet (minimum 3 points)".to_string(),
    };
    println!(
        "  capturing: {} point(s), {} segment(s), {}",
        session.len(),
        session.segments().len(),
        polygon
    );
}
