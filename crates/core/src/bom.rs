//! BOM handler (C4).
//!
//! Three total operations on byte buffers. `add_bom` is idempotent; `strip_bom`
//! removes at most one BOM.

pub const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

pub fn has_bom(b: &[u8]) -> bool {
    b.starts_with(&BOM)
}

pub fn strip_bom(b: &[u8]) -> Vec<u8> {
    if has_bom(b) {
        b[BOM.len()..].to_vec()
    } else {
        b.to_vec()
    }
}

pub fn add_bom(b: &[u8]) -> Vec<u8> {
    if has_bom(b) {
        b.to_vec()
    } else {
        let mut out = Vec::with_capacity(BOM.len() + b.len());
        out.extend_from_slice(&BOM);
        out.extend_from_slice(b);
        out
    }
}
