//! Static HTML tag tables.

use phf::phf_set;

/// Elements that never have children or a closing tag.
pub static VOID_TAGS: phf::Set<&'static str> = phf_set! {
    "area", "base", "br", "col", "embed", "hr", "img", "input",
    "link", "meta", "param", "source", "track", "wbr"
};

/// Form controls that carry a live `value` property.
pub static FORM_CONTROL_TAGS: phf::Set<&'static str> = phf_set! {
    "input", "textarea", "select"
};

/// Check if a tag is void (self-closing, no end tag)
#[inline]
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(tag.to_ascii_lowercase().as_str())
}

/// Check if a tag is a form control
#[inline]
pub fn is_form_control_tag(tag: &str) -> bool {
    FORM_CONTROL_TAGS.contains(tag.to_ascii_lowercase().as_str())
}
