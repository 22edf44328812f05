//! Command framing.
//!
//! Five fields in fixed order, integers little-endian:
//!
//! ```text
//! ┌──────────┬───────────────┬─────────────┬─────────────────┬───────────────┐
//! │ kind: 4  │ origin len: 4 │ origin: var │ metadata len: 4 │ metadata: var │
//! └──────────┴───────────────┴─────────────┴─────────────────┴───────────────┘
//! ```
//!
//! The sender writes and flushes each field separately, so [`FrameFields`]
//! keeps them apart instead of handing out one contiguous buffer.

use std::{fmt, io::Read};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{
    command::Command,
    errors::{ProtocolError, Result},
    kind::CommandKind,
    origin::Origin,
};

/// Size of every integer field on the wire.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// One of the five fields of a command frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameField {
    /// Command kind code.
    Kind,
    /// Byte length of the origin text.
    OriginLength,
    /// Origin ASCII text.
    Origin,
    /// Byte length of the metadata.
    MetadataLength,
    /// Raw metadata.
    Metadata,
}

impl FrameField {
    /// Fields in wire order.
    pub const ALL: [Self; 5] =
        [Self::Kind, Self::OriginLength, Self::Origin, Self::MetadataLength, Self::Metadata];

    /// Zero-based position of the field in the frame.
    pub fn position(self) -> usize {
        self as usize
    }
}

impl fmt::Display for FrameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Kind => "kind",
            Self::OriginLength => "origin length",
            Self::Origin => "origin",
            Self::MetadataLength => "metadata length",
            Self::Metadata => "metadata",
        })
    }
}

/// Bounds applied while decoding.
///
/// A frame that declares a longer field is rejected before any buffer is
/// allocated for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum origin length in bytes.
    pub max_origin_len: usize,
    /// Maximum metadata length in bytes.
    pub max_metadata_len: usize,
}

impl DecodeLimits {
    /// Longest origin [`Origin::host`] accepts.
    pub const DEFAULT_MAX_ORIGIN_LEN: usize = Origin::MAX_HOST_LEN;

    /// 16 MiB.
    pub const DEFAULT_MAX_METADATA_LEN: usize = 16 * 1024 * 1024;

    fn check_origin(&self, len: u32) -> Result<usize> {
        let len = len as usize;
        if len == 0 {
            return Err(ProtocolError::EmptyOrigin);
        }
        if len > self.max_origin_len {
            return Err(ProtocolError::OriginTooLong { len, max: self.max_origin_len });
        }
        Ok(len)
    }

    fn check_metadata(&self, len: u32) -> Result<usize> {
        let len = len as usize;
        if len > self.max_metadata_len {
            return Err(ProtocolError::MetadataTooLarge { len, max: self.max_metadata_len });
        }
        Ok(len)
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self {
            max_origin_len: Self::DEFAULT_MAX_ORIGIN_LEN,
            max_metadata_len: Self::DEFAULT_MAX_METADATA_LEN,
        }
    }
}

/// Encoded fields of one command, ready to be written in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameFields {
    kind: [u8; LENGTH_PREFIX_SIZE],
    origin_len: [u8; LENGTH_PREFIX_SIZE],
    origin: Bytes,
    metadata_len: [u8; LENGTH_PREFIX_SIZE],
    metadata: Bytes,
}

impl FrameFields {
    /// Encoded bytes of a single field.
    pub fn get(&self, field: FrameField) -> &[u8] {
        match field {
            FrameField::Kind => &self.kind,
            FrameField::OriginLength => &self.origin_len,
            FrameField::Origin => &self.origin,
            FrameField::MetadataLength => &self.metadata_len,
            FrameField::Metadata => &self.metadata,
        }
    }

    /// Fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (FrameField, &[u8])> + '_ {
        FrameField::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// Total frame size in bytes.
    pub fn encoded_len(&self) -> usize {
        3 * LENGTH_PREFIX_SIZE + self.origin.len() + self.metadata.len()
    }

    /// Command kind code carried in the first field.
    pub fn kind_code(&self) -> u32 {
        u32::from_le_bytes(self.kind)
    }

    /// Append the whole frame to `dst`.
    pub fn write_to(&self, dst: &mut impl BufMut) {
        for (_, bytes) in self.iter() {
            dst.put_slice(bytes);
        }
    }
}

/// A value that splits into the five fields of a command frame.
pub trait EncodeFrame {
    /// Encode into frame fields.
    ///
    /// # Errors
    ///
    /// `LengthOverflow` if a variable field does not fit a 32-bit length
    /// prefix.
    fn frame_fields(&self) -> Result<FrameFields>;
}

impl EncodeFrame for Command {
    fn frame_fields(&self) -> Result<FrameFields> {
        Command::frame_fields(self)
    }
}

fn length_prefix(field: FrameField, len: usize) -> Result<[u8; LENGTH_PREFIX_SIZE]> {
    u32::try_from(len)
        .map(u32::to_le_bytes)
        .map_err(|_| ProtocolError::LengthOverflow { field, len })
}

impl Command {
    /// Split this command into its encoded frame fields.
    ///
    /// # Errors
    ///
    /// `LengthOverflow` if the origin or metadata does not fit a 32-bit length
    /// prefix.
    pub fn frame_fields(&self) -> Result<FrameFields> {
        let origin = Bytes::from(self.origin().to_ascii());
        let metadata = self.metadata().cloned().unwrap_or_default();

        Ok(FrameFields {
            kind: self.kind().to_u32().to_le_bytes(),
            origin_len: length_prefix(FrameField::Origin, origin.len())?,
            origin,
            metadata_len: length_prefix(FrameField::Metadata, metadata.len())?,
            metadata,
        })
    }

    /// Total frame size in bytes.
    pub fn encoded_len(&self) -> usize {
        3 * LENGTH_PREFIX_SIZE + self.origin().to_ascii().len() + self.metadata_bytes().len()
    }

    /// Append the encoded frame to `dst`.
    pub fn encode(&self, dst: &mut impl BufMut) -> Result<()> {
        self.frame_fields()?.write_to(dst);
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let fields = self.frame_fields()?;
        let mut buf = BytesMut::with_capacity(fields.encoded_len());
        fields.write_to(&mut buf);
        Ok(buf.freeze())
    }

    /// Decode one frame from `src` with [`DecodeLimits::default`].
    pub fn decode(src: &mut impl Buf) -> Result<Self> {
        Self::decode_with_limits(src, &DecodeLimits::default())
    }

    /// Decode one frame from `src`.
    ///
    /// Consumes exactly the bytes of one frame on success. On error the
    /// position of `src` is unspecified.
    pub fn decode_with_limits(src: &mut impl Buf, limits: &DecodeLimits) -> Result<Self> {
        let code = take_u32(src, FrameField::Kind)?;
        let kind = CommandKind::from_u32(code).ok_or(ProtocolError::UnknownCommandKind(code))?;

        let origin_len = limits.check_origin(take_u32(src, FrameField::OriginLength)?)?;
        ensure_remaining(&*src, FrameField::Origin, origin_len)?;
        let origin = parse_origin(&src.copy_to_bytes(origin_len))?;

        let metadata_len = limits.check_metadata(take_u32(src, FrameField::MetadataLength)?)?;
        ensure_remaining(&*src, FrameField::Metadata, metadata_len)?;
        let metadata = src.copy_to_bytes(metadata_len);

        Ok(Self::new(kind, origin, Some(metadata)))
    }
}

/// Read one frame from a blocking stream.
///
/// Blocks until the whole frame has arrived. A stream that ends mid-frame
/// yields [`ProtocolError::Io`] naming the incomplete field.
pub fn read_command<R: Read + ?Sized>(reader: &mut R, limits: &DecodeLimits) -> Result<Command> {
    let code = read_u32(reader, FrameField::Kind)?;
    let kind = CommandKind::from_u32(code).ok_or(ProtocolError::UnknownCommandKind(code))?;

    let origin_len = limits.check_origin(read_u32(reader, FrameField::OriginLength)?)?;
    let mut origin = vec![0u8; origin_len];
    read_exact(reader, FrameField::Origin, &mut origin)?;
    let origin = parse_origin(&origin)?;

    let metadata_len = limits.check_metadata(read_u32(reader, FrameField::MetadataLength)?)?;
    let mut metadata = vec![0u8; metadata_len];
    read_exact(reader, FrameField::Metadata, &mut metadata)?;

    Ok(Command::new(kind, origin, Some(Bytes::from(metadata))))
}

fn ensure_remaining(src: &impl Buf, field: FrameField, needed: usize) -> Result<()> {
    let available = src.remaining();
    if available < needed {
        return Err(ProtocolError::Truncated { field, needed, available });
    }
    Ok(())
}

fn take_u32(src: &mut impl Buf, field: FrameField) -> Result<u32> {
    ensure_remaining(&*src, field, LENGTH_PREFIX_SIZE)?;
    Ok(src.get_u32_le())
}

fn read_exact<R: Read + ?Sized>(reader: &mut R, field: FrameField, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(|source| ProtocolError::Io { field, source })
}

fn read_u32<R: Read + ?Sized>(reader: &mut R, field: FrameField) -> Result<u32> {
    let mut buf = [0u8; LENGTH_PREFIX_SIZE];
    read_exact(reader, field, &mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn parse_origin(bytes: &[u8]) -> Result<Origin> {
    let text = String::from_utf8_lossy(bytes);
    if !bytes.is_ascii() {
        return Err(ProtocolError::NonAsciiOrigin(text.into_owned()));
    }
    Origin::parse(&text)
}
