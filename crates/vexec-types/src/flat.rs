//! Little-endian accessors for flat buffers.

pub(crate) const SIZE_OF_LONG: usize = std::mem::size_of::<i64>();
pub(crate) const SIZE_OF_INT: usize = std::mem::size_of::<i32>();

#[inline]
pub(crate) fn read_i64_le(fixed: &[u8], offset: usize) -> i64 {
    let mut bytes = [0u8; SIZE_OF_LONG];
    bytes.copy_from_slice(&fixed[offset..offset + SIZE_OF_LONG]);
    i64::from_le_bytes(bytes)
}

#[inline]
pub(crate) fn read_i32_le(fixed: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; SIZE_OF_INT];
    bytes.copy_from_slice(&fixed[offset..offset + SIZE_OF_INT]);
    i32::from_le_bytes(bytes)
}

#[inline]
pub(crate) fn write_i64_le(fixed: &mut [u8], offset: usize, value: i64) {
    fixed[offset..offset + SIZE_OF_LONG].copy_from_slice(&value.to_le_bytes());
}

#[inline]
pub(crate) fn write_i32_le(fixed: &mut [u8], offset: usize, value: i32) {
    fixed[offset..offset + SIZE_OF_INT].copy_from_slice(&value.to_le_bytes());
}
