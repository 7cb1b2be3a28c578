//! Formatting utilities

use glam::{Mat4, Quat, Vec3};

/// Format a vector as `(x, y, z)` with three decimals
pub fn format_vec3(v: Vec3) -> String {
    format!("({:.3}, {:.3}, {:.3})", v.x, v.y, v.z)
}

/// Format a rotation as axis and angle in degrees
pub fn format_rotation(q: Quat) -> String {
    let (axis, angle) = q.to_axis_angle();
    if angle.abs() < 1e-6 {
        "identity".to_string()
    } else {
        format!("{:.1}° about {}", angle.to_degrees(), format_vec3(axis))
    }
}

/// Format a millisecond duration, switching to seconds from one second up
pub fn format_duration_ms(ms: f32) -> String {
    if ms >= 1000.0 {
        format!("{:.2} s", ms / 1000.0)
    } else {
        format!("{ms:.0} ms")
    }
}

/// Format a matrix as four row-major lines
pub fn format_matrix(m: &Mat4, indent: &str) -> String {
    (0..4)
        .map(|r| {
            let row = m.row(r);
            format!(
                "{indent}[{:9.4} {:9.4} {:9.4} {:9.4}]",
                row.x, row.y, row.z, row.w
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
