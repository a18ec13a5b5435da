// @generated by resgen. Do not edit.
//! Accessors for `drawable` resources.

use resgen::ResourceHandle;

/// `drawable:icon_6`
#[inline]
pub fn icon_6() -> &'static ResourceHandle {
    &super::shards::drawable_0::icon_6
}

/// `drawable:icon_60`
#[inline]
pub fn icon_60() -> &'static ResourceHandle {
    &super::shards::drawable_0::icon_60
}

/// `drawable:icon_600`
#[inline]
pub fn icon_600() -> &'static ResourceHandle {
    &super::shards::drawable_1::icon_600
}

/// `drawable:logo`
#[inline]
pub fn logo() -> &'static ResourceHandle {
    &super::shards::drawable_1::logo
}
