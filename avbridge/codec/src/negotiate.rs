/*!
    Pixel format negotiation bridging.

    When a decoder can produce several output formats it asks its
    `get_format` hook to pick one. The hook is a fixed C function pointer,
    so the policy cannot live in application code directly; this module
    installs a fixed trampoline that turns the decoder's
    sentinel-terminated candidate list into a bounds-known slice, scanned
    exactly once, and hands it to the chooser registered for that context.

    No format preference policy lives here; the chooser owns it entirely.
*/

use std::collections::BTreeMap;
use std::slice;
use std::sync::Arc;

use avbridge_types::PixelFormat;
use ffmpeg_next::ffi::{AVCodecContext, AVPixelFormat};
use parking_lot::Mutex;

/**
    The external decision function for one decoding context.

    Receives the negotiating context and the candidate formats in decoder
    preference order, without the terminating sentinel. Must return one of
    the candidates, or [`PixelFormat::NONE`] to fail the negotiation.

    Runs on the decoder's own call stack: it must not block indefinitely
    and must not call back into the decode pipeline. Installing or
    resetting choosers from inside is allowed; the registry lock is not
    held while the chooser runs.
*/
pub type FormatChooser = Box<dyn FnMut(*mut AVCodecContext, &[PixelFormat]) -> PixelFormat + Send>;

// Each entry carries its own lock so the registry lock covers only the
// lookup, never the chooser invocation.
static CHOOSERS: Mutex<BTreeMap<usize, Arc<Mutex<FormatChooser>>>> = Mutex::new(BTreeMap::new());

/**
    Install `chooser` as the format negotiation hook for `ctx`.

    Only one chooser is active per context; installing replaces any
    previous one. The hook stays active until [`reset_format_chooser`] is
    called or the chooser is replaced.

    # Safety

    `ctx` must point to a valid `AVCodecContext`, and
    [`reset_format_chooser`] must be called before the context is freed;
    otherwise a later context allocated at the same address would observe
    the stale chooser.
*/
pub unsafe fn install_format_chooser(ctx: *mut AVCodecContext, chooser: FormatChooser) {
    CHOOSERS
        .lock()
        .insert(ctx as usize, Arc::new(Mutex::new(chooser)));
    unsafe {
        (*ctx).get_format = Some(negotiate_format);
    }
}

/**
    Remove the negotiation hook from `ctx`, restoring decoder-default
    format selection.

    # Safety

    `ctx` must point to a valid `AVCodecContext`.
*/
pub unsafe fn reset_format_chooser(ctx: *mut AVCodecContext) {
    unsafe {
        (*ctx).get_format = None;
    }
    CHOOSERS.lock().remove(&(ctx as usize));
}

/// Number of candidates before the terminating sentinel.
unsafe fn candidate_count(candidates: *const AVPixelFormat) -> usize {
    let mut count = 0;
    while unsafe { *candidates.add(count) } != AVPixelFormat::AV_PIX_FMT_NONE {
        count += 1;
    }
    count
}

unsafe extern "C" fn negotiate_format(
    ctx: *mut AVCodecContext,
    candidates: *const AVPixelFormat,
) -> AVPixelFormat {
    let count = unsafe { candidate_count(candidates) };
    // PixelFormat is a transparent wrapper over AVPixelFormat, so the
    // native list can be viewed in place.
    let candidates = unsafe { slice::from_raw_parts(candidates.cast::<PixelFormat>(), count) };
    // Clone the entry out so the registry lock is released before the
    // chooser runs; concurrent negotiations on other contexts proceed,
    // and the chooser may reconfigure the registry itself.
    let entry = CHOOSERS.lock().get(&(ctx as usize)).cloned();
    match entry {
        Some(entry) => {
            let mut chooser = entry.lock();
            (*chooser)(ctx, candidates).into_raw()
        }
        // A hook without a registered chooser makes the decoder fall back
        // to its default selection path.
        None => AVPixelFormat::AV_PIX_FMT_NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::ptr;
    use std::sync::Arc;

    use ffmpeg_next::ffi;

    const YUV420P: AVPixelFormat = AVPixelFormat::AV_PIX_FMT_YUV420P;
    const NV12: AVPixelFormat = AVPixelFormat::AV_PIX_FMT_NV12;
    const RGB24: AVPixelFormat = AVPixelFormat::AV_PIX_FMT_RGB24;
    const NONE: AVPixelFormat = AVPixelFormat::AV_PIX_FMT_NONE;

    fn alloc_context() -> *mut AVCodecContext {
        let ctx = unsafe { ffi::avcodec_alloc_context3(ptr::null()) };
        assert!(!ctx.is_null());
        ctx
    }

    fn free_context(mut ctx: *mut AVCodecContext) {
        unsafe { ffi::avcodec_free_context(&mut ctx) };
    }

    #[test]
    fn counts_candidates_up_to_sentinel() {
        let empty = [NONE];
        let one = [YUV420P, NONE];
        let three = [YUV420P, NV12, RGB24, NONE];
        unsafe {
            assert_eq!(candidate_count(empty.as_ptr()), 0);
            assert_eq!(candidate_count(one.as_ptr()), 1);
            assert_eq!(candidate_count(three.as_ptr()), 3);
        }
    }

    #[test]
    fn chooser_receives_bounds_known_list() {
        let ctx = alloc_context();
        let seen: Arc<Mutex<Vec<PixelFormat>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        unsafe {
            install_format_chooser(
                ctx,
                Box::new(move |_, candidates| {
                    sink.lock().extend_from_slice(candidates);
                    candidates[1]
                }),
            );
            assert!((*ctx).get_format.is_some());
        }

        let candidates = [YUV420P, NV12, NONE];
        let chosen = unsafe { negotiate_format(ctx, candidates.as_ptr()) };

        assert_eq!(chosen, NV12);
        assert_eq!(
            seen.lock().as_slice(),
            &[PixelFormat::new(YUV420P), PixelFormat::new(NV12)]
        );

        unsafe {
            reset_format_chooser(ctx);
            assert!((*ctx).get_format.is_none());
        }
        free_context(ctx);
    }

    #[test]
    fn empty_candidate_list_reaches_chooser() {
        let ctx = alloc_context();
        unsafe {
            install_format_chooser(
                ctx,
                Box::new(|_, candidates| {
                    assert!(candidates.is_empty());
                    PixelFormat::NONE
                }),
            );
        }

        let candidates = [NONE];
        let chosen = unsafe { negotiate_format(ctx, candidates.as_ptr()) };
        assert_eq!(chosen, NONE);

        unsafe { reset_format_chooser(ctx) };
        free_context(ctx);
    }

    #[test]
    fn install_replaces_previous_chooser() {
        let ctx = alloc_context();
        unsafe {
            install_format_chooser(ctx, Box::new(|_, _| PixelFormat::new(RGB24)));
            install_format_chooser(ctx, Box::new(|_, candidates| candidates[0]));
        }

        let candidates = [YUV420P, RGB24, NONE];
        let chosen = unsafe { negotiate_format(ctx, candidates.as_ptr()) };
        assert_eq!(chosen, YUV420P);

        unsafe { reset_format_chooser(ctx) };
        free_context(ctx);
    }

    #[test]
    fn chooser_may_reconfigure_the_registry() {
        // The registry lock is released before the chooser runs, so a
        // chooser replacing itself must complete instead of deadlocking
        // on the non-reentrant lock.
        let ctx = alloc_context();
        unsafe {
            install_format_chooser(
                ctx,
                Box::new(|ctx, candidates| {
                    unsafe {
                        install_format_chooser(ctx, Box::new(|_, candidates| candidates[0]));
                    }
                    candidates[candidates.len() - 1]
                }),
            );
        }

        let candidates = [YUV420P, RGB24, NONE];
        let first = unsafe { negotiate_format(ctx, candidates.as_ptr()) };
        assert_eq!(first, RGB24);

        let second = unsafe { negotiate_format(ctx, candidates.as_ptr()) };
        assert_eq!(second, YUV420P);

        unsafe { reset_format_chooser(ctx) };
        free_context(ctx);
    }

    #[test]
    fn unregistered_context_yields_sentinel() {
        // The trampoline only uses the context address as a key, so a
        // dummy address is enough to probe the miss path.
        let mut dummy = 0u8;
        let ctx = (&mut dummy as *mut u8).cast::<AVCodecContext>();

        let candidates = [YUV420P, NONE];
        let chosen = unsafe { negotiate_format(ctx, candidates.as_ptr()) };
        assert_eq!(chosen, NONE);
    }
}
