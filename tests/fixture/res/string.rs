// @generated by resgen. Do not edit.
//! Accessors for `string` resources.

use resgen::ResourceHandle;

/// `string:app_name`
#[inline]
pub fn app_name() -> &'static ResourceHandle {
    &super::shards::string_0::app_name
}

/// `string:type`
#[inline]
pub fn r#type() -> &'static ResourceHandle {
    &super::shards::string_0::r#type
}
