//! Формат travelbook-логов версии 5 (`5FRT`).
//!
//! Официальной спецификации нет, раскладка восстановлена по содержимому
//! файлов. Все многобайтовые числа хранятся в little-endian.
//!
//! ```text
//! [0..4]   MAGIC              b"5FRT"
//! [4..21]  favorite           i32
//!          log_type           u8
//!          log_start_time     u32
//!          log_duration       u32
//!          log_length         u32
//!          4 × (u16 len + UTF-16LE)  start / end / start time / destination
//!          end_lon            i32   (×10⁻⁵ °)
//!          end_lat            i32   (×10⁻⁵ °)
//!          point_count        u32
//!          point_count × 21 байт точек
//! ```
//!
//! Контрольной суммы в формате нет: сдвиг любого поля на байт молча портит
//! всё, что идёт после него.

use std::{io::Read, iter::FusedIterator};

use log::debug;
use travelbook_types::{LogError, LogResult, RawHeader, RawPoint};

use crate::binary::{
    write_length_prefixed_text, write_values, ByteCursor, Fields, FixedLayout, Primitive, Value,
};

/// Единственная поддерживаемая версия формата
pub const LOG_VERSION: u8 = 5;

/// Магическое число: версия цифрой и `FRT`, т.е. b"5FRT"
pub const LOG_MAGIC: [u8; 4] = [b'0' + LOG_VERSION, b'F', b'R', b'T'];

/// Размер одной точки в байтах
pub const POINT_RECORD_SIZE: usize = RawPoint::SIZE;

/// Фиксированный блок сразу после magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogInfoBlock {
    pub favorite: i32,
    pub log_type: u8,
    pub log_start_time: u32,
    pub log_duration: u32,
    pub log_length: u32,
}

/// Фиксированный блок после строк, непосредственно перед точками.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsInfoBlock {
    pub end_lon: i32,
    pub end_lat: i32,
    pub point_count: u32,
}

impl FixedLayout for LogInfoBlock {
    const LAYOUT: &'static [Primitive] = &[
        Primitive::I32,
        Primitive::U8,
        Primitive::U32,
        Primitive::U32,
        Primitive::U32,
    ];

    fn decode(f: &mut Fields<'_>) -> Self {
        Self {
            favorite: f.i32(),
            log_type: f.u8(),
            log_start_time: f.u32(),
            log_duration: f.u32(),
            log_length: f.u32(),
        }
    }
}

impl FixedLayout for PointsInfoBlock {
    const LAYOUT: &'static [Primitive] = &[Primitive::I32, Primitive::I32, Primitive::U32];

    fn decode(f: &mut Fields<'_>) -> Self {
        Self {
            end_lon: f.i32(),
            end_lat: f.i32(),
            point_count: f.u32(),
        }
    }
}

impl FixedLayout for RawPoint {
    const LAYOUT: &'static [Primitive] = &[
        Primitive::I32,
        Primitive::I32,
        Primitive::I32,
        Primitive::U32,
        Primitive::F32,
        Primitive::I8,
        Primitive::I8,
        Primitive::I8,
        Primitive::I8,
        Primitive::I8,
    ];

    fn decode(f: &mut Fields<'_>) -> Self {
        Self {
            lon: f.i32(),
            lat: f.i32(),
            alt: f.i32(),
            time_offset_ms: f.u32(),
            speed: f.f32(),
            signal_quality: f.i8(),
            speeding: f.i8(),
            gsm_signal_quality: f.i8(),
            internet_signal_quality: f.i8(),
            battery_status: f.i8(),
        }
    }
}

/// Кодирование/декодирование заголовка 5FRT.
pub trait RawHeaderExt: Sized {
    /// Читает заголовок с начала файла. Курсор остаётся ровно на первой точке.
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> LogResult<Self>;

    /// Кодирует заголовок вместе с magic.
    fn encode(&self) -> LogResult<Vec<u8>>;

    /// Размер сериализованного заголовка в байтах.
    fn encoded_len(&self) -> usize;
}

/// Кодирование одной точки.
pub trait RawPointExt {
    fn encode(&self) -> LogResult<[u8; POINT_RECORD_SIZE]>;
}

impl RawHeaderExt for RawHeader {
    fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> LogResult<Self> {
        let magic = cursor.read_bytes::<4>()?;
        if magic != LOG_MAGIC {
            return Err(LogError::UnsupportedFormat { magic });
        }

        let info: LogInfoBlock = cursor.read_record()?;

        let start_point_description = cursor.read_length_prefixed_text()?;
        let end_point_description = cursor.read_length_prefixed_text()?;
        let start_time_string = cursor.read_length_prefixed_text()?;
        let programmed_destination_description = cursor.read_length_prefixed_text()?;

        let points: PointsInfoBlock = cursor.read_record()?;

        debug!(
            "5FRT header: start={start_time_string:?}, points={}, data offset={}",
            points.point_count,
            cursor.position()
        );

        Ok(RawHeader {
            favorite: info.favorite,
            log_type: info.log_type,
            log_start_time: info.log_start_time,
            log_duration: info.log_duration,
            log_length: info.log_length,
            start_point_description,
            end_point_description,
            start_time_string,
            programmed_destination_description,
            end_lon: points.end_lon,
            end_lat: points.end_lat,
            point_count: points.point_count,
        })
    }

    fn encode(&self) -> LogResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(self.encoded_len());

        buf.extend_from_slice(&LOG_MAGIC);
        write_values(
            &mut buf,
            &[
                Value::I32(self.favorite),
                Value::U8(self.log_type),
                Value::U32(self.log_start_time),
                Value::U32(self.log_duration),
                Value::U32(self.log_length),
            ],
        )?;

        write_length_prefixed_text(&mut buf, &self.start_point_description)?;
        write_length_prefixed_text(&mut buf, &self.end_point_description)?;
        write_length_prefixed_text(&mut buf, &self.start_time_string)?;
        write_length_prefixed_text(&mut buf, &self.programmed_destination_description)?;

        write_values(
            &mut buf,
            &[
                Value::I32(self.end_lon),
                Value::I32(self.end_lat),
                Value::U32(self.point_count),
            ],
        )?;

        Ok(buf)
    }

    fn encoded_len(&self) -> usize {
        let text = |s: &str| 2 + 2 * s.encode_utf16().count();

        LOG_MAGIC.len()
            + LogInfoBlock::SIZE
            + text(&self.start_point_description)
            + text(&self.end_point_description)
            + text(&self.start_time_string)
            + text(&self.programmed_destination_description)
            + PointsInfoBlock::SIZE
    }
}

impl RawPointExt for RawPoint {
    fn encode(&self) -> LogResult<[u8; POINT_RECORD_SIZE]> {
        let mut buf = Vec::with_capacity(POINT_RECORD_SIZE);

        write_values(
            &mut buf,
            &[
                Value::I32(self.lon),
                Value::I32(self.lat),
                Value::I32(self.alt),
                Value::U32(self.time_offset_ms),
                Value::F32(self.speed),
                Value::I8(self.signal_quality),
                Value::I8(self.speeding),
                Value::I8(self.gsm_signal_quality),
                Value::I8(self.internet_signal_quality),
                Value::I8(self.battery_status),
            ],
        )?;

        let mut out = [0u8; POINT_RECORD_SIZE];
        out.copy_from_slice(&buf);
        Ok(out)
    }
}

/// Ленивый поток точек лога.
///
/// Читает ровно `point_count` записей и не больше. Однопроходный: курсор
/// принадлежит потоку, повторное чтение требует нового курсора. После первой
/// ошибки поток заканчивается.
pub struct PointStream<R> {
    cursor: ByteCursor<R>,
    remaining: u32,
    failed: bool,
}

impl<R: Read> PointStream<R> {
    /// `cursor` должен стоять сразу за заголовком.
    pub fn new(
        cursor: ByteCursor<R>,
        point_count: u32,
    ) -> Self {
        Self {
            cursor,
            remaining: point_count,
            failed: false,
        }
    }

    /// Сколько точек ещё не прочитано.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Текущая позиция курсора в файле.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }
}

impl<R: Read> Iterator for PointStream<R> {
    type Item = LogResult<RawPoint>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == 0 {
            return None;
        }

        match self.cursor.read_record::<RawPoint>() {
            Ok(point) => {
                self.remaining -= 1;
                Some(Ok(point))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (0, Some(self.remaining() as usize))
        }
    }
}

impl<R: Read> FusedIterator for PointStream<R> {}
