use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use glam::{Mat4, Quat, Vec3};

use crate::errors::{OrreryError, Result};
use crate::scene::HiResCoord;

/// Primitive and semantic-type writer over a byte stream.
///
/// Big-endian throughout. Floating-point values are written as their raw
/// IEEE-754 bit patterns, so `read(write(v))` is bit-for-bit exact — no
/// renormalization happens in the codec.
pub struct SceneWriter<'a> {
    out: &'a mut dyn Write,
}

impl<'a> SceneWriter<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        Self { out }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes)?;
        Ok(())
    }

    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        self.out.write_u8(value)?;
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        self.write_u8(u8::from(value))
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        self.out.write_i32::<BigEndian>(value)?;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.out.write_u32::<BigEndian>(value)?;
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<()> {
        self.out.write_u32::<BigEndian>(value.to_bits())?;
        Ok(())
    }

    /// Array length prefix. Every array in the format is length-prefixed;
    /// readers allocate exactly this many elements.
    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = i32::try_from(len)
            .map_err(|_| OrreryError::CorruptStream("array too long for format".into()))?;
        self.write_i32(len)
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_len(value.len())?;
        self.write_bytes(value.as_bytes())
    }

    pub fn write_opt_string(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            Some(s) => {
                self.write_bool(true)?;
                self.write_string(s)
            }
            None => self.write_bool(false),
        }
    }

    pub fn write_vec3(&mut self, value: Vec3) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)
    }

    pub fn write_quat(&mut self, value: Quat) -> Result<()> {
        self.write_f32(value.x)?;
        self.write_f32(value.y)?;
        self.write_f32(value.z)?;
        self.write_f32(value.w)
    }

    /// 4x4 matrix, column-major, 16 floats.
    pub fn write_mat4(&mut self, value: &Mat4) -> Result<()> {
        for v in value.to_cols_array() {
            self.write_f32(v)?;
        }
        Ok(())
    }

    /// High-resolution coordinate: three axes of eight 32-bit words each,
    /// most significant word first.
    pub fn write_hires(&mut self, value: &HiResCoord) -> Result<()> {
        for axis in [&value.x, &value.y, &value.z] {
            for &word in axis {
                self.write_i32(word)?;
            }
        }
        Ok(())
    }
}

/// Primitive and semantic-type reader over a byte stream.
///
/// Exact inverse of [`SceneWriter`]. Stream exhaustion surfaces as an
/// `UnexpectedEof` I/O error; malformed payloads surface as
/// [`OrreryError::CorruptStream`]. Both abort the session unrecovered.
pub struct SceneReader<'a> {
    input: &'a mut dyn Read,
}

impl<'a> SceneReader<'a> {
    pub fn new(input: &'a mut dyn Read) -> Self {
        Self { input }
    }

    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.input.read_exact(buf)?;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.input.read_u8()?)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(OrreryError::CorruptStream(format!(
                "invalid bool byte {other:#04x}"
            ))),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(self.input.read_i32::<BigEndian>()?)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(self.input.read_u32::<BigEndian>()?)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.input.read_u32::<BigEndian>()?))
    }

    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        usize::try_from(len)
            .map_err(|_| OrreryError::CorruptStream(format!("negative array length {len}")))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_len()?;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|_| OrreryError::CorruptStream("string is not valid UTF-8".into()))
    }

    pub fn read_opt_string(&mut self) -> Result<Option<String>> {
        if self.read_bool()? {
            Ok(Some(self.read_string()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_vec3(&mut self) -> Result<Vec3> {
        Ok(Vec3::new(
            self.read_f32()?,
            self.read_f32()?,
            self.read_f32()?,
        ))
    }

    pub fn read_quat(&mut self) -> Result<Quat> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        let w = self.read_f32()?;
        Ok(Quat::from_xyzw(x, y, z, w))
    }

    pub fn read_mat4(&mut self) -> Result<Mat4> {
        let mut cols = [0.0f32; 16];
        for v in &mut cols {
            *v = self.read_f32()?;
        }
        Ok(Mat4::from_cols_array(&cols))
    }

    pub fn read_hires(&mut self) -> Result<HiResCoord> {
        let mut coord = HiResCoord::ORIGIN;
        for axis in [&mut coord.x, &mut coord.y, &mut coord.z] {
            for word in axis.iter_mut() {
                *word = self.read_i32()?;
            }
        }
        Ok(coord)
    }
}
