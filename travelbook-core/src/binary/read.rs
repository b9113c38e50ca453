use std::io::{ErrorKind, Read};

use byteorder::{ByteOrder, LittleEndian};
use travelbook_types::{LogError, LogResult};

/// Примитив фиксированной ширины (все little-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
}

/// Декодированное значение примитива.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
}

impl Primitive {
    /// Ширина в байтах.
    pub const fn width(self) -> usize {
        match self {
            Primitive::I8 | Primitive::U8 => 1,
            Primitive::I16 | Primitive::U16 => 2,
            Primitive::I32 | Primitive::U32 | Primitive::F32 => 4,
            Primitive::I64 | Primitive::U64 => 8,
        }
    }
}

/// Суммарный размер раскладки в байтах.
pub const fn layout_size(layout: &[Primitive]) -> usize {
    let mut size = 0;
    let mut i = 0;

    while i < layout.len() {
        size += layout[i].width();
        i += 1;
    }

    size
}

/// Последовательное чтение полей из уже полностью прочитанного блока.
///
/// Блок всегда имеет длину `layout_size(LAYOUT)`, поэтому сами чтения не
/// могут выйти за границу.
pub struct Fields<'a> {
    buf: &'a [u8],
    off: usize,
}

impl<'a> Fields<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, off: 0 }
    }

    fn take(
        &mut self,
        n: usize,
    ) -> &'a [u8] {
        let s = &self.buf[self.off..self.off + n];
        self.off += n;
        s
    }

    pub fn i8(&mut self) -> i8 {
        self.take(1)[0] as i8
    }

    pub fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    pub fn i16(&mut self) -> i16 {
        LittleEndian::read_i16(self.take(2))
    }

    pub fn u16(&mut self) -> u16 {
        LittleEndian::read_u16(self.take(2))
    }

    pub fn i32(&mut self) -> i32 {
        LittleEndian::read_i32(self.take(4))
    }

    pub fn u32(&mut self) -> u32 {
        LittleEndian::read_u32(self.take(4))
    }

    pub fn i64(&mut self) -> i64 {
        LittleEndian::read_i64(self.take(8))
    }

    pub fn u64(&mut self) -> u64 {
        LittleEndian::read_u64(self.take(8))
    }

    pub fn f32(&mut self) -> f32 {
        LittleEndian::read_f32(self.take(4))
    }

    pub fn value(
        &mut self,
        kind: Primitive,
    ) -> Value {
        match kind {
            Primitive::I8 => Value::I8(self.i8()),
            Primitive::U8 => Value::U8(self.u8()),
            Primitive::I16 => Value::I16(self.i16()),
            Primitive::U16 => Value::U16(self.u16()),
            Primitive::I32 => Value::I32(self.i32()),
            Primitive::U32 => Value::U32(self.u32()),
            Primitive::I64 => Value::I64(self.i64()),
            Primitive::U64 => Value::U64(self.u64()),
            Primitive::F32 => Value::F32(self.f32()),
        }
    }
}

/// Запись фиксированной раскладки, читаемая одним вызовом
/// [`ByteCursor::read_record`].
pub trait FixedLayout: Sized {
    /// Поля записи в порядке их следования в файле.
    const LAYOUT: &'static [Primitive];

    /// Размер записи в байтах.
    const SIZE: usize = layout_size(Self::LAYOUT);

    /// Собирает запись из блока ровно в `SIZE` байт.
    fn decode(fields: &mut Fields<'_>) -> Self;
}

/// Последовательный курсор над источником байтов.
///
/// Владеет источником: файл закрывается вместе с курсором на любом пути
/// выхода. Назад не перематывается.
pub struct ByteCursor<R> {
    inner: R,
    position: u64,
    scratch: Vec<u8>,
}

impl<R: Read> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            position: 0,
            scratch: Vec::new(),
        }
    }

    /// Сколько байт уже прочитано.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Читает ровно `n` байт во внутренний буфер.
    fn fill(
        &mut self,
        n: usize,
    ) -> LogResult<&[u8]> {
        self.scratch.resize(n, 0);

        match self.inner.read_exact(&mut self.scratch[..n]) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                return Err(LogError::truncated(self.position, n));
            }
            Err(e) => return Err(LogError::Io(e)),
        }

        self.position += n as u64;

        Ok(&self.scratch[..n])
    }

    /// Читает `N` сырых байт.
    pub fn read_bytes<const N: usize>(&mut self) -> LogResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.fill(N)?);
        Ok(out)
    }

    /// Читает блок по произвольной раскладке и возвращает значения по порядку.
    ///
    /// Либо потребляет ровно `layout_size(layout)` байт, либо возвращает
    /// [`LogError::TruncatedInput`].
    pub fn read_fixed(
        &mut self,
        layout: &[Primitive],
    ) -> LogResult<Vec<Value>> {
        let buf = self.fill(layout_size(layout))?;
        let mut fields = Fields::new(buf);

        Ok(layout.iter().map(|&kind| fields.value(kind)).collect())
    }

    /// Типизированный вариант [`read_fixed`](Self::read_fixed).
    pub fn read_record<T: FixedLayout>(&mut self) -> LogResult<T> {
        let buf = self.fill(T::SIZE)?;
        Ok(T::decode(&mut Fields::new(buf)))
    }

    /// Читает строку: u16 длина в UTF-16 символах, затем `2 * len` байт.
    pub fn read_length_prefixed_text(&mut self) -> LogResult<String> {
        let len = u16::from_le_bytes(self.read_bytes::<2>()?) as usize;
        let offset = self.position;
        let bytes = self.fill(len * 2)?;

        decode_wide(bytes).ok_or(LogError::TextDecodeError { offset })
    }
}

/// UTF-16 с учётом BOM: без BOM little-endian.
fn decode_wide(bytes: &[u8]) -> Option<String> {
    let mut units: Vec<u16> = bytes.chunks_exact(2).map(LittleEndian::read_u16).collect();

    match units.first() {
        Some(0xFEFF) => {
            units.remove(0);
        }
        Some(0xFFFE) => {
            units.remove(0);
            for u in units.iter_mut() {
                *u = u.swap_bytes();
            }
        }
        _ => {}
    }

    String::from_utf16(&units).ok()
}
