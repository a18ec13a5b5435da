// @generated by resgen. Do not edit.
#![allow(non_upper_case_globals)]

use resgen::{ResourceHandle, ResourceItem, ResourceKind};

pub(in super::super) static icon_6: ResourceHandle = ResourceHandle::new(
    "drawable:icon_6",
    ResourceKind::Drawable,
    &[
        ResourceItem::new(&[], "drawable/icon_6.xml"),
    ],
);

pub(in super::super) static icon_60: ResourceHandle = ResourceHandle::new(
    "drawable:icon_60",
    ResourceKind::Drawable,
    &[
        ResourceItem::new(&[], "drawable/icon_60.xml"),
    ],
);
