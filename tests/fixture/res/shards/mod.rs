// @generated by resgen. Do not edit.
pub(super) mod drawable_0;
pub(super) mod drawable_1;
pub(super) mod string_0;
