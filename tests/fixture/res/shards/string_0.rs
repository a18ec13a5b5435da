// @generated by resgen. Do not edit.
#![allow(non_upper_case_globals)]

use resgen::{ResourceHandle, ResourceItem, ResourceKind};

pub(in super::super) static app_name: ResourceHandle = ResourceHandle::new(
    "string:app_name",
    ResourceKind::String,
    &[
        ResourceItem::new(&[], "values/strings.xml"),
    ],
);

pub(in super::super) static r#type: ResourceHandle = ResourceHandle::new(
    "string:type",
    ResourceKind::String,
    &[
        ResourceItem::new(&[], "values/strings.xml"),
    ],
);
