// @generated by resgen. Do not edit.
#![allow(non_upper_case_globals)]

use resgen::{ResourceHandle, ResourceItem, ResourceKind};

pub(in super::super) static icon_600: ResourceHandle = ResourceHandle::new(
    "drawable:icon_600",
    ResourceKind::Drawable,
    &[
        ResourceItem::new(&[], "drawable/icon_600.xml"),
    ],
);

pub(in super::super) static logo: ResourceHandle = ResourceHandle::new(
    "drawable:logo",
    ResourceKind::Drawable,
    &[
        ResourceItem::new(&["night"], "drawable-night/logo.xml"),
        ResourceItem::new(&[], "drawable/logo.xml"),
    ],
);
