/*!
    AVOptions bridging.

    String-typed get/set on any AVOptions-enabled object. The native getter
    hands back an allocation it expects the caller to free; that exchange
    is kept inside this module so callers only see owned strings.
*/

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;

use avbridge_types::{Error, Result};
use ffmpeg_next::ffi;

/**
    Read a named option from an AVOptions-enabled object as a string.

    Child objects are searched as well. The native call allocates the
    returned value; it is copied into an owned `String` and the native
    buffer released before returning.

    # Safety

    `obj` must point to a struct whose first member is an `AVClass`
    pointer describing its options.

    # Errors

    Negative native status codes are propagated unmodified; an unknown
    option name surfaces as the native "option not found" status.
*/
pub unsafe fn get(obj: *mut c_void, name: &str) -> Result<String> {
    let name = cstring(name)?;
    let mut value: *mut u8 = ptr::null_mut();
    let ret = unsafe {
        ffi::av_opt_get(
            obj,
            name.as_ptr(),
            ffi::AV_OPT_SEARCH_CHILDREN as c_int,
            &mut value,
        )
    };
    if ret < 0 {
        return Err(Error::from_raw(ret));
    }
    if value.is_null() {
        return Ok(String::new());
    }
    let out = unsafe { CStr::from_ptr(value as *const c_char) }
        .to_string_lossy()
        .into_owned();
    unsafe { ffi::av_freep((&mut value as *mut *mut u8).cast()) };
    Ok(out)
}

/**
    Set a named option on an AVOptions-enabled object from a string.

    Child objects are searched as well.

    # Safety

    `obj` must point to a struct whose first member is an `AVClass`
    pointer describing its options.

    # Errors

    Negative native status codes are propagated unmodified.
*/
pub unsafe fn set(obj: *mut c_void, name: &str, value: &str) -> Result<()> {
    let name = cstring(name)?;
    let value = cstring(value)?;
    let ret = unsafe {
        ffi::av_opt_set(
            obj,
            name.as_ptr(),
            value.as_ptr(),
            ffi::AV_OPT_SEARCH_CHILDREN as c_int,
        )
    };
    if ret < 0 {
        return Err(Error::from_raw(ret));
    }
    Ok(())
}

fn cstring(s: &str) -> Result<CString> {
    CString::new(s).map_err(|_| Error::invalid_argument("embedded NUL in option string"))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::ptr;

    #[test]
    fn set_then_get_roundtrips() {
        let mut ctx = unsafe { ffi::avcodec_alloc_context3(ptr::null()) };
        assert!(!ctx.is_null());

        unsafe {
            set(ctx.cast(), "threads", "7").unwrap();
            assert_eq!(get(ctx.cast(), "threads").unwrap(), "7");
            ffi::avcodec_free_context(&mut ctx);
        }
    }

    #[test]
    fn unknown_option_propagates_native_status() {
        let mut ctx = unsafe { ffi::avcodec_alloc_context3(ptr::null()) };
        assert!(!ctx.is_null());

        let err = unsafe { get(ctx.cast(), "no-such-option").unwrap_err() };
        assert!(err.raw() < 0);

        unsafe { ffi::avcodec_free_context(&mut ctx) };
    }

    #[test]
    fn nul_in_name_is_rejected() {
        let err = unsafe { get(ptr::null_mut(), "bad\0name").unwrap_err() };
        assert!(err.is_invalid_argument());
    }
}
