//! Пример: запись синтетического 5FRT-лога через LogWriter
//!
//! Демонстрирует:
//! - создание заголовка и LogWriter
//! - генерацию точек по окружности с постоянной скоростью
//! - автоматическое исправление point_count при finish()

use std::fs::File;

use travelbook_core::{LogWriter, RawHeader, RawPoint};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = "travelbook-core/test_output.log";

    // --- Заголовок ---
    let header = RawHeader {
        start_point_description: "Storgata 1, Tromsø".to_string(),
        end_point_description: "Storgata 1, Tromsø".to_string(),
        start_time_string: "130615_143000_000".to_string(),
        end_lon: 1_896_512,
        end_lat: 6_965_278,
        ..Default::default()
    };

    // --- LogWriter ---
    let file = File::create(output_path)?;
    let mut writer = LogWriter::new(file, header)?;

    // --- Круг радиусом ~0.01° с шагом 1 с ---
    let num_points = 600u32;

    for i in 0..num_points {
        let phi = 2.0 * std::f64::consts::PI * i as f64 / num_points as f64;
        let point = RawPoint {
            lon: 1_896_512 + (1_000.0 * phi.cos()) as i32,
            lat: 6_965_278 + (1_000.0 * phi.sin()) as i32,
            alt: 40,
            time_offset_ms: i * 1_000,
            speed: 36.0,
            signal_quality: 3,
            battery_status: -1,
            ..Default::default()
        };
        writer.write_point(&point)?;
    }

    // finish() перезаписывает point_count в заголовке
    let total = writer.point_count();
    writer.finish()?;

    println!("✓ Записано: {output_path}");
    println!("  Points   : {total}");

    Ok(())
}
