//! Пример: чтение 5FRT-лога через LogReader
//!
//! Демонстрирует:
//! - открытие файла и валидацию заголовка
//! - ленивую итерацию точек
//! - нормализацию точек в градусы, м/с и UTC

use travelbook_core::{LogReader, Normalizer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "travelbook-core/test_output.log".to_string());

    // --- LogReader валидирует заголовок при открытии ---
    let reader = match LogReader::open(&input_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("✗ Header validation failed: {e}");
            return Err(Box::new(e));
        }
    };

    let h = reader.header();
    println!("✓ Header validated");
    println!("  Start         : {}", h.start_point_description);
    println!("  End           : {}", h.end_point_description);
    println!("  Destination   : {}", h.programmed_destination_description);
    println!("  Start time    : {}", h.start_time_string);
    println!("  End position  : {:?}", h.end_position());
    println!("  Point count   : {}", h.point_count);
    println!("  Data offset   : {}", reader.data_offset());

    let normalizer = Normalizer::new(h, 0)?;
    let mut points = reader.into_points();

    // --- Показываем первые 3 точки ---
    println!("\nFirst points:");
    for i in 0..3 {
        let Some(raw) = points.next() else { break };
        let p = normalizer.normalize(&raw?);
        println!(
            "  [{i}] {:.5}, {:.5} @ {} ({:.1} m, {:.2} m/s)",
            p.latitude, p.longitude, p.timestamp, p.elevation, p.speed
        );
    }

    println!(
        "\n{} points left, cursor at byte {}",
        points.remaining(),
        points.position()
    );

    Ok(())
}
