use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};

use byteorder::{LittleEndian, WriteBytesExt};
use travelbook_types::{LogError, LogResult, RawHeader, RawPoint};

use crate::{
    binary::ByteCursor,
    format::{PointStream, RawHeaderExt, RawPointExt},
};

/// Потоковый читатель travelbook-логов.
///
/// Заголовок читается и проверяется при создании. Точки читаются лениво через
/// [`LogReader::into_points`]; читатель при этом потребляется, так что
/// источник закрывается вместе с потоком точек.
pub struct LogReader<R: Read> {
    cursor: ByteCursor<BufReader<R>>,
    header: RawHeader,
}

/// Потоковый писатель travelbook-логов (синтетические файлы для тестов и
/// бенчмарков).
pub struct LogWriter<W: Write + Seek> {
    writer: BufWriter<W>,
    count_offset: u64,
    point_count: u32,
}

impl LogReader<File> {
    /// Открывает лог по пути.
    pub fn open<P: AsRef<Path>>(path: P) -> LogResult<Self> {
        Self::new(File::open(path)?)
    }
}

impl<R: Read> LogReader<R> {
    /// Создаёт читатель, читая и валидируя заголовок из `inner`.
    pub fn new(inner: R) -> LogResult<Self> {
        let mut cursor = ByteCursor::new(BufReader::new(inner));
        let header = RawHeader::decode(&mut cursor)?;

        Ok(Self { cursor, header })
    }

    /// Прочитанный заголовок файла.
    pub fn header(&self) -> &RawHeader {
        &self.header
    }

    /// Смещение первой точки от начала файла.
    pub fn data_offset(&self) -> u64 {
        self.cursor.position()
    }

    /// Превращает читатель в ленивый поток ровно из `point_count` точек.
    pub fn into_points(self) -> PointStream<BufReader<R>> {
        PointStream::new(self.cursor, self.header.point_count)
    }

    /// Разделяет читатель на заголовок и поток точек.
    pub fn into_parts(self) -> (RawHeader, PointStream<BufReader<R>>) {
        let stream = PointStream::new(self.cursor, self.header.point_count);
        (self.header, stream)
    }
}

/// Convenience: читает весь лог целиком.
pub fn read_log<R: Read>(inner: R) -> LogResult<(RawHeader, Vec<RawPoint>)> {
    let (header, stream) = LogReader::new(inner)?.into_parts();
    let points = stream.collect::<LogResult<Vec<_>>>()?;

    Ok((header, points))
}

impl<W: Write + Seek> LogWriter<W> {
    /// Создаёт новый писатель, немедленно записывая заголовок в поток.
    ///
    /// `point_count` из заголовка игнорируется и перезаписывается в
    /// [`finish`](Self::finish) числом реально записанных точек.
    pub fn new(
        mut inner: W,
        header: RawHeader,
    ) -> LogResult<Self> {
        let start = inner.stream_position()?;
        let bytes = header.encode()?;
        // point_count: последние 4 байта заголовка
        let count_offset = start + bytes.len() as u64 - 4;

        let mut writer = BufWriter::new(inner);
        writer.write_all(&bytes)?;

        Ok(Self {
            writer,
            count_offset,
            point_count: 0,
        })
    }

    /// Записывает одну точку.
    pub fn write_point(
        &mut self,
        point: &RawPoint,
    ) -> LogResult<()> {
        self.writer.write_all(&point.encode()?)?;
        self.point_count += 1;

        Ok(())
    }

    /// Количество записанных точек.
    pub fn point_count(&self) -> u32 {
        self.point_count
    }

    /// Завершает запись: сбрасывает буфер и исправляет `point_count`.
    pub fn finish(mut self) -> LogResult<W> {
        self.writer.flush()?;

        let mut inner = self
            .writer
            .into_inner()
            .map_err(|e| LogError::Io(e.into_error()))?;

        let end = inner.stream_position()?;
        inner.seek(SeekFrom::Start(self.count_offset))?;
        inner.write_u32::<LittleEndian>(self.point_count)?;
        inner.seek(SeekFrom::Start(end))?;
        inner.flush()?;

        Ok(inner)
    }
}
