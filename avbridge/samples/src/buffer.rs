/*!
    Plane-aware sample copying.
*/

use std::ffi::c_int;

use avbridge_types::{Error, Result, SampleFormat};
use ffmpeg_next::ffi;

/**
    Copy audio plane data into a flat destination buffer.

    The required total size and the per-plane line size come from
    `av_samples_get_buffer_size`, the same rule the native pipeline uses to
    size its own buffers; the plane count is their quotient. Planes are
    written back to back into `dst` in order, with no padding between them.

    `planes` holds one source slice per audio plane: a single slice for
    packed formats, one per channel for planar formats. Only the first
    `plane count` entries are read.

    Returns the number of bytes written.

    # Errors

    `Error::InvalidArgument` when the sizing rule rejects the
    channel/format/alignment combination, when the computed size exceeds
    `dst.len()`, or when `planes` does not provide `line size` bytes for
    every consumed plane. `dst` is untouched in every error case.
*/
pub fn copy_to_buffer(
    dst: &mut [u8],
    planes: &[&[u8]],
    nb_channels: i32,
    nb_samples: i32,
    format: SampleFormat,
    align: i32,
) -> Result<usize> {
    let mut line_size: c_int = 0;
    let buffer_size = unsafe {
        ffi::av_samples_get_buffer_size(
            &mut line_size,
            nb_channels as c_int,
            nb_samples as c_int,
            format.into_raw(),
            align as c_int,
        )
    };
    if buffer_size < 0 || line_size <= 0 {
        return Err(Error::invalid_argument(format!(
            "unsupported sample buffer layout: {nb_channels} channels, {nb_samples} samples"
        )));
    }

    let buffer_size = buffer_size as usize;
    let line_size = line_size as usize;
    if buffer_size > dst.len() {
        return Err(Error::invalid_argument(format!(
            "destination holds {} bytes, {buffer_size} required",
            dst.len()
        )));
    }

    // Both values come from the sizing rule, so this divides evenly for
    // conforming formats.
    let nb_planes = buffer_size / line_size;
    if planes.len() < nb_planes {
        return Err(Error::invalid_argument(format!(
            "{nb_planes} planes required, {} provided",
            planes.len()
        )));
    }
    if let Some(short) = planes[..nb_planes].iter().position(|p| p.len() < line_size) {
        return Err(Error::invalid_argument(format!(
            "plane {short} holds fewer than {line_size} bytes"
        )));
    }

    let segments = dst[..buffer_size].chunks_exact_mut(line_size);
    for (segment, plane) in segments.zip(&planes[..nb_planes]) {
        segment.copy_from_slice(&plane[..line_size]);
    }
    Ok(buffer_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize, seed: u8) -> Vec<u8> {
        (0..len).map(|i| (i as u8).wrapping_add(seed)).collect()
    }

    #[test]
    fn packed_s16_fills_single_plane() {
        // 2 channels x 100 samples x 2 bytes, packed: one 400-byte plane.
        let src = pattern(400, 1);
        let mut dst = vec![0u8; 4096];

        let written =
            copy_to_buffer(&mut dst, &[&src], 2, 100, SampleFormat::S16, 1).unwrap();

        assert_eq!(written, 400);
        assert_eq!(&dst[..400], &src[..]);
        assert!(dst[400..].iter().all(|&b| b == 0));
    }

    #[test]
    fn planar_channels_land_in_order() {
        // 2 channels x 64 float samples, planar: two 256-byte planes.
        let left = pattern(256, 0xa0);
        let right = pattern(256, 0x0b);
        let mut dst = vec![0u8; 512];

        let written =
            copy_to_buffer(&mut dst, &[&left, &right], 2, 64, SampleFormat::FLTP, 1).unwrap();

        assert_eq!(written, 512);
        assert_eq!(&dst[..256], &left[..]);
        assert_eq!(&dst[256..], &right[..]);
    }

    #[test]
    fn alignment_pads_the_line_size() {
        // 10 samples x 2 bytes = 20 bytes, padded up to the 32-byte
        // alignment boundary.
        let src = pattern(32, 0);
        let mut dst = vec![0u8; 64];

        let written = copy_to_buffer(&mut dst, &[&src], 1, 10, SampleFormat::S16, 32).unwrap();

        assert_eq!(written, 32);
        assert_eq!(&dst[..32], &src[..]);
    }

    #[test]
    fn small_destination_writes_nothing() {
        let src = pattern(400, 1);
        let mut dst = vec![0x5au8; 64];

        let err = copy_to_buffer(&mut dst, &[&src], 2, 100, SampleFormat::S16, 1).unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(dst.iter().all(|&b| b == 0x5a));
    }

    #[test]
    fn rejected_combination_writes_nothing() {
        let src = [0u8; 16];
        let mut dst = vec![0x5au8; 64];

        let err = copy_to_buffer(&mut dst, &[&src[..]], -1, 100, SampleFormat::S16, 1).unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(dst.iter().all(|&b| b == 0x5a));
    }

    #[test]
    fn missing_plane_is_rejected() {
        let left = pattern(256, 0);
        let mut dst = vec![0u8; 512];

        let err =
            copy_to_buffer(&mut dst, &[&left], 2, 64, SampleFormat::FLTP, 1).unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(dst.iter().all(|&b| b == 0));
    }

    #[test]
    fn short_plane_is_rejected() {
        let left = pattern(256, 0);
        let right = pattern(100, 0);
        let mut dst = vec![0u8; 512];

        let err =
            copy_to_buffer(&mut dst, &[&left, &right], 2, 64, SampleFormat::FLTP, 1).unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(dst.iter().all(|&b| b == 0));
    }
}
