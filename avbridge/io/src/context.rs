/*!
    Custom AVIO contexts over Rust I/O values.
*/

use std::ffi::{c_int, c_void};
use std::io::{Read, Seek, SeekFrom, Write};
use std::ptr::{self, NonNull};
use std::slice;

use avbridge_types::{Error, Result};
use ffmpeg_next::ffi::{self, AVIOContext};

/// Default native I/O buffer size in bytes.
const DEFAULT_BUFFER_SIZE: usize = 4096;

unsafe extern "C" fn read_packet<T: Read>(
    opaque: *mut c_void,
    buf: *mut u8,
    buf_size: c_int,
) -> c_int {
    let source = unsafe { &mut *opaque.cast::<T>() };
    let buf = unsafe { slice::from_raw_parts_mut(buf, buf_size as usize) };
    match source.read(buf) {
        Ok(0) => ffi::AVERROR_EOF,
        Ok(read) => read as c_int,
        Err(_) => ffi::AVERROR(libc::EIO),
    }
}

unsafe extern "C" fn write_packet<T: Write>(
    opaque: *mut c_void,
    buf: *mut u8,
    buf_size: c_int,
) -> c_int {
    let sink = unsafe { &mut *opaque.cast::<T>() };
    let buf = unsafe { slice::from_raw_parts(buf, buf_size as usize) };
    match sink.write_all(buf) {
        Ok(()) => buf_size,
        Err(_) => ffi::AVERROR(libc::EIO),
    }
}

unsafe extern "C" fn seek_stream<T: Seek>(opaque: *mut c_void, offset: i64, whence: c_int) -> i64 {
    let stream = unsafe { &mut *opaque.cast::<T>() };
    if whence == ffi::AVSEEK_SIZE as c_int {
        return stream_size(stream);
    }
    let target = if whence == libc::SEEK_SET {
        SeekFrom::Start(offset as u64)
    } else if whence == libc::SEEK_CUR {
        SeekFrom::Current(offset)
    } else if whence == libc::SEEK_END {
        SeekFrom::End(offset)
    } else {
        return i64::from(ffi::AVERROR(libc::EINVAL));
    };
    match stream.seek(target) {
        Ok(pos) => pos as i64,
        Err(_) => i64::from(ffi::AVERROR(libc::EIO)),
    }
}

/// Total stream length, restoring the current position afterwards.
fn stream_size<T: Seek>(stream: &mut T) -> i64 {
    let Ok(current) = stream.stream_position() else {
        return i64::from(ffi::AVERROR(libc::EIO));
    };
    let Ok(end) = stream.seek(SeekFrom::End(0)) else {
        return i64::from(ffi::AVERROR(libc::EIO));
    };
    if stream.seek(SeekFrom::Start(current)).is_err() {
        return i64::from(ffi::AVERROR(libc::EIO));
    }
    end as i64
}

/**
    An `AVIOContext` backed by a Rust I/O value.

    The value is boxed and handed to the native side as the opaque
    context; the fixed trampolines above resolve it back on every native
    I/O call. Dropping the `IoContext` releases the native context, its
    buffer and the boxed value.
*/
pub struct IoContext<T> {
    ctx: NonNull<AVIOContext>,
    opaque: *mut T,
}

/**
    Builder for [`IoContext`].
*/
pub struct IoContextBuilder {
    buffer_size: usize,
}

impl Default for IoContextBuilder {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl IoContextBuilder {
    /**
        Set the native I/O buffer size in bytes.
    */
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /**
        Build a read-only context over `source`.
    */
    pub fn reader<T: Read + Seek>(self, source: T) -> Result<IoContext<T>> {
        IoContext::alloc(
            self.buffer_size,
            source,
            0,
            Some(read_packet::<T>),
            None,
            Some(seek_stream::<T>),
        )
    }

    /**
        Build a writable context over `sink`.
    */
    pub fn writer<T: Write + Seek>(self, sink: T) -> Result<IoContext<T>> {
        IoContext::alloc(
            self.buffer_size,
            sink,
            1,
            None,
            Some(write_packet::<T>),
            Some(seek_stream::<T>),
        )
    }
}

impl IoContext<()> {
    /**
        Start building a context with a non-default buffer size.
    */
    pub fn builder() -> IoContextBuilder {
        IoContextBuilder::default()
    }
}

impl<T: Read + Seek> IoContext<T> {
    /**
        Read-only context over `source` with the default buffer size.
    */
    pub fn reader(source: T) -> Result<Self> {
        IoContextBuilder::default().reader(source)
    }
}

impl<T: Write + Seek> IoContext<T> {
    /**
        Writable context over `sink` with the default buffer size.
    */
    pub fn writer(sink: T) -> Result<Self> {
        IoContextBuilder::default().writer(sink)
    }
}

type ReadFn = unsafe extern "C" fn(*mut c_void, *mut u8, c_int) -> c_int;
type WriteFn = unsafe extern "C" fn(*mut c_void, *mut u8, c_int) -> c_int;
type SeekFn = unsafe extern "C" fn(*mut c_void, i64, c_int) -> i64;

impl<T> IoContext<T> {
    fn alloc(
        buffer_size: usize,
        value: T,
        write_flag: c_int,
        read: Option<ReadFn>,
        write: Option<WriteFn>,
        seek: Option<SeekFn>,
    ) -> Result<Self> {
        let buffer = NonNull::new(unsafe { ffi::av_malloc(buffer_size) }).ok_or(Error::Allocation)?;
        let opaque = Box::into_raw(Box::new(value));
        let ctx = unsafe {
            ffi::avio_alloc_context(
                buffer.as_ptr().cast(),
                buffer_size as c_int,
                write_flag,
                opaque.cast(),
                read,
                write,
                seek,
            )
        };
        let Some(ctx) = NonNull::new(ctx) else {
            unsafe {
                ffi::av_free(buffer.as_ptr());
                drop(Box::from_raw(opaque));
            }
            return Err(Error::Allocation);
        };
        Ok(Self { ctx, opaque })
    }

    /**
        The raw context, for attaching to a format context's `pb`.

        The pointer stays owned by this value; whatever it was attached to
        must detach before this value drops.
    */
    pub fn as_mut_ptr(&mut self) -> *mut AVIOContext {
        self.ctx.as_ptr()
    }
}

unsafe impl<T: Send> Send for IoContext<T> {}

impl<T> Drop for IoContext<T> {
    fn drop(&mut self) {
        unsafe {
            ffi::av_freep(ptr::addr_of_mut!((*self.ctx.as_ptr()).buffer).cast());
            let mut ctx = self.ctx.as_ptr();
            ffi::avio_context_free(&mut ctx);
            drop(Box::from_raw(self.opaque));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    type Mem = Cursor<Vec<u8>>;

    fn opaque_of(cursor: &mut Mem) -> *mut c_void {
        (cursor as *mut Mem).cast()
    }

    #[test]
    fn read_trampoline_drains_then_reports_eof() {
        let mut cursor = Cursor::new(vec![1u8, 2, 3]);
        let opaque = opaque_of(&mut cursor);
        let mut buf = [0u8; 8];

        let n = unsafe { read_packet::<Mem>(opaque, buf.as_mut_ptr(), buf.len() as c_int) };
        assert_eq!(n, 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);

        let n = unsafe { read_packet::<Mem>(opaque, buf.as_mut_ptr(), buf.len() as c_int) };
        assert_eq!(n, ffi::AVERROR_EOF);
    }

    #[test]
    fn write_trampoline_appends_to_sink() {
        let mut cursor = Cursor::new(Vec::new());
        let opaque = opaque_of(&mut cursor);
        let data = [9u8, 8, 7, 6];

        let n = unsafe { write_packet::<Mem>(opaque, data.as_ptr().cast_mut(), data.len() as c_int) };
        assert_eq!(n, 4);
        assert_eq!(cursor.into_inner(), vec![9, 8, 7, 6]);
    }

    #[test]
    fn seek_trampoline_maps_whence() {
        let mut cursor = Cursor::new(vec![0u8; 100]);
        let opaque = opaque_of(&mut cursor);

        unsafe {
            assert_eq!(seek_stream::<Mem>(opaque, 10, libc::SEEK_SET), 10);
            assert_eq!(seek_stream::<Mem>(opaque, 5, libc::SEEK_CUR), 15);
            assert_eq!(seek_stream::<Mem>(opaque, -20, libc::SEEK_END), 80);
            assert_eq!(
                seek_stream::<Mem>(opaque, 0, 99),
                i64::from(ffi::AVERROR(libc::EINVAL))
            );
        }
    }

    #[test]
    fn seek_trampoline_probes_size_without_moving() {
        let mut cursor = Cursor::new(vec![0u8; 64]);
        cursor.set_position(12);
        let opaque = opaque_of(&mut cursor);

        let size = unsafe { seek_stream::<Mem>(opaque, 0, ffi::AVSEEK_SIZE as c_int) };
        assert_eq!(size, 64);
        assert_eq!(cursor.position(), 12);
    }

    #[test]
    fn reader_allocates_and_frees_cleanly() {
        let mut ctx = IoContext::reader(Cursor::new(vec![0u8; 16])).unwrap();
        assert!(!ctx.as_mut_ptr().is_null());
        drop(ctx);
    }

    #[test]
    fn writer_honors_custom_buffer_size() {
        let mut ctx = IoContext::builder()
            .buffer_size(512)
            .writer(Cursor::new(Vec::new()))
            .unwrap();
        unsafe {
            assert_eq!((*ctx.as_mut_ptr()).buffer_size, 512);
            assert_eq!((*ctx.as_mut_ptr()).write_flag, 1);
        }
    }
}
