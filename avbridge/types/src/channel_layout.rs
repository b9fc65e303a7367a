/*!
    Bridged channel layout constants.

    The native `AV_CHANNEL_LAYOUT_*` macros are struct initializers and do
    not survive binding generation, so the named layouts are rebuilt here
    from the `AVChannel` enum. Each constant is an opaque immutable
    descriptor the native audio pipeline consumes by pointer.
*/

use std::ffi::{CStr, c_char};
use std::fmt;
use std::ptr;

use ffmpeg_next::ffi::{
    self, AVChannel, AVChannelLayout, AVChannelLayout__bindgen_ty_1, AVChannelOrder,
};

const fn ch(channel: AVChannel) -> u64 {
    1u64 << channel as u64
}

const FL: u64 = ch(AVChannel::AV_CHAN_FRONT_LEFT);
const FR: u64 = ch(AVChannel::AV_CHAN_FRONT_RIGHT);
const FC: u64 = ch(AVChannel::AV_CHAN_FRONT_CENTER);
const LFE: u64 = ch(AVChannel::AV_CHAN_LOW_FREQUENCY);
const BL: u64 = ch(AVChannel::AV_CHAN_BACK_LEFT);
const BR: u64 = ch(AVChannel::AV_CHAN_BACK_RIGHT);
const FLC: u64 = ch(AVChannel::AV_CHAN_FRONT_LEFT_OF_CENTER);
const FRC: u64 = ch(AVChannel::AV_CHAN_FRONT_RIGHT_OF_CENTER);
const BC: u64 = ch(AVChannel::AV_CHAN_BACK_CENTER);
const SL: u64 = ch(AVChannel::AV_CHAN_SIDE_LEFT);
const SR: u64 = ch(AVChannel::AV_CHAN_SIDE_RIGHT);
const TC: u64 = ch(AVChannel::AV_CHAN_TOP_CENTER);
const TFL: u64 = ch(AVChannel::AV_CHAN_TOP_FRONT_LEFT);
const TFC: u64 = ch(AVChannel::AV_CHAN_TOP_FRONT_CENTER);
const TFR: u64 = ch(AVChannel::AV_CHAN_TOP_FRONT_RIGHT);
const TBL: u64 = ch(AVChannel::AV_CHAN_TOP_BACK_LEFT);
const TBC: u64 = ch(AVChannel::AV_CHAN_TOP_BACK_CENTER);
const TBR: u64 = ch(AVChannel::AV_CHAN_TOP_BACK_RIGHT);
const SDL: u64 = ch(AVChannel::AV_CHAN_STEREO_LEFT);
const SDR: u64 = ch(AVChannel::AV_CHAN_STEREO_RIGHT);
const WL: u64 = ch(AVChannel::AV_CHAN_WIDE_LEFT);
const WR: u64 = ch(AVChannel::AV_CHAN_WIDE_RIGHT);

/**
    An immutable, named multichannel layout descriptor.

    Values are handed to the native audio pipeline by pointer via
    [`ChannelLayout::as_ptr`]; the native side copies what it needs and
    never mutates through the pointer.
*/
#[derive(Clone, Copy)]
pub struct ChannelLayout(AVChannelLayout);

// Layouts built here are plain data in native order; `opaque` is always
// null.
unsafe impl Send for ChannelLayout {}
unsafe impl Sync for ChannelLayout {}

const fn native(mask: u64) -> ChannelLayout {
    ChannelLayout(AVChannelLayout {
        order: AVChannelOrder::AV_CHANNEL_ORDER_NATIVE,
        nb_channels: mask.count_ones() as i32,
        u: AVChannelLayout__bindgen_ty_1 { mask },
        opaque: ptr::null_mut(),
    })
}

impl ChannelLayout {
    pub const MONO: Self = native(FC);
    pub const STEREO: Self = native(FL | FR);
    pub const TWO_POINT_ONE: Self = native(FL | FR | LFE);
    pub const TWO_ONE: Self = native(FL | FR | BC);
    pub const SURROUND: Self = native(FL | FR | FC);
    pub const THREE_POINT_ONE: Self = native(FL | FR | FC | LFE);
    pub const FOUR_POINT_ZERO: Self = native(FL | FR | FC | BC);
    pub const FOUR_POINT_ONE: Self = native(FL | FR | FC | LFE | BC);
    pub const TWO_TWO: Self = native(FL | FR | SL | SR);
    pub const QUAD: Self = native(FL | FR | BL | BR);
    pub const FIVE_POINT_ZERO: Self = native(FL | FR | FC | SL | SR);
    pub const FIVE_POINT_ONE: Self = native(FL | FR | FC | LFE | SL | SR);
    pub const FIVE_POINT_ZERO_BACK: Self = native(FL | FR | FC | BL | BR);
    pub const FIVE_POINT_ONE_BACK: Self = native(FL | FR | FC | LFE | BL | BR);
    pub const SIX_POINT_ZERO: Self = native(FL | FR | FC | SL | SR | BC);
    pub const SIX_POINT_ZERO_FRONT: Self = native(FL | FR | FLC | FRC | SL | SR);
    pub const HEXAGONAL: Self = native(FL | FR | FC | BL | BR | BC);
    pub const SIX_POINT_ONE: Self = native(FL | FR | FC | LFE | SL | SR | BC);
    pub const SIX_POINT_ONE_BACK: Self = native(FL | FR | FC | LFE | BL | BR | BC);
    pub const SIX_POINT_ONE_FRONT: Self = native(FL | FR | FLC | FRC | SL | SR | LFE);
    pub const SEVEN_POINT_ZERO: Self = native(FL | FR | FC | SL | SR | BL | BR);
    pub const SEVEN_POINT_ZERO_FRONT: Self = native(FL | FR | FC | SL | SR | FLC | FRC);
    pub const SEVEN_POINT_ONE: Self = native(FL | FR | FC | LFE | SL | SR | BL | BR);
    pub const SEVEN_POINT_ONE_WIDE: Self = native(FL | FR | FC | LFE | SL | SR | FLC | FRC);
    pub const SEVEN_POINT_ONE_WIDE_BACK: Self = native(FL | FR | FC | LFE | BL | BR | FLC | FRC);
    pub const OCTAGONAL: Self = native(FL | FR | FC | SL | SR | BL | BC | BR);
    pub const CUBE: Self = native(FL | FR | BL | BR | TFL | TFR | TBL | TBR);
    pub const HEXADECAGONAL: Self =
        native(FL | FR | FC | SL | SR | BL | BC | BR | WL | WR | TBL | TBR | TBC | TFC | TFL | TFR);
    pub const STEREO_DOWNMIX: Self = native(SDL | SDR);

    /**
        Build a native-order layout from a raw channel mask.
    */
    pub const fn from_mask(mask: u64) -> Self {
        native(mask)
    }

    /**
        Number of channels in the layout.
    */
    pub const fn channels(&self) -> i32 {
        self.0.nb_channels
    }

    /**
        The raw channel mask.
    */
    pub fn mask(&self) -> u64 {
        // Native-order layouts always use the mask member of the union.
        unsafe { self.0.u.mask }
    }

    /**
        Returns true if the native library considers the layout valid.
    */
    pub fn is_valid(&self) -> bool {
        unsafe { ffi::av_channel_layout_check(&self.0) == 1 }
    }

    /**
        Human-readable description from the native library, e.g. "5.1".
    */
    pub fn describe(&self) -> String {
        let mut buf = [0 as c_char; 128];
        let ret = unsafe { ffi::av_channel_layout_describe(&self.0, buf.as_mut_ptr(), buf.len()) };
        if ret < 0 {
            return String::new();
        }
        unsafe { CStr::from_ptr(buf.as_ptr()) }
            .to_string_lossy()
            .into_owned()
    }

    /**
        The raw descriptor, for handing to native calls that copy it.
    */
    pub const fn as_ptr(&self) -> *const AVChannelLayout {
        &self.0
    }
}

impl PartialEq for ChannelLayout {
    fn eq(&self, other: &Self) -> bool {
        self.0.order == other.0.order
            && self.0.nb_channels == other.0.nb_channels
            && self.mask() == other.mask()
    }
}

impl Eq for ChannelLayout {}

impl fmt::Debug for ChannelLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelLayout")
            .field("channels", &self.channels())
            .field("mask", &format_args!("{:#x}", self.mask()))
            .finish()
    }
}
