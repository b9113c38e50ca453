use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use travelbook_types::LogResult;

use super::Value;

/// Пишет значение примитива в little-endian.
pub fn write_value<W: Write>(
    out: &mut W,
    value: Value,
) -> LogResult<()> {
    match value {
        Value::I8(v) => out.write_i8(v)?,
        Value::U8(v) => out.write_u8(v)?,
        Value::I16(v) => out.write_i16::<LittleEndian>(v)?,
        Value::U16(v) => out.write_u16::<LittleEndian>(v)?,
        Value::I32(v) => out.write_i32::<LittleEndian>(v)?,
        Value::U32(v) => out.write_u32::<LittleEndian>(v)?,
        Value::I64(v) => out.write_i64::<LittleEndian>(v)?,
        Value::U64(v) => out.write_u64::<LittleEndian>(v)?,
        Value::F32(v) => out.write_f32::<LittleEndian>(v)?,
    }

    Ok(())
}

/// Пишет несколько значений подряд.
pub fn write_values<W: Write>(
    out: &mut W,
    values: &[Value],
) -> LogResult<()> {
    for &v in values {
        write_value(out, v)?;
    }

    Ok(())
}

/// Пишет строку в виде u16 длины (в UTF-16 символах) и UTF-16LE данных.
pub fn write_length_prefixed_text<W: Write>(
    out: &mut W,
    s: &str,
) -> LogResult<()> {
    let units: Vec<u16> = s.encode_utf16().collect();
    let len = u16::try_from(units.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("text field too long: {} UTF-16 units", units.len()),
        )
    })?;

    out.write_u16::<LittleEndian>(len)?;
    for u in units {
        out.write_u16::<LittleEndian>(u)?;
    }

    Ok(())
}
