//! Upper-half (0x80..=0xFF) byte-to-scalar tables for the single-byte encodings
//! that `encoding_rs` does not expose under the WHATWG label set: true
//! ISO-8859-1, ISO-8859-9 and CP850. The lower half (0x00..=0x7F) is ASCII for
//! all of them.

/// ISO-8859-9 (Latin-5 / Turkish) differs from ISO-8859-1 at exactly six code
/// points; everything else falls back to the identity mapping in
/// [`super::encoding::decode_byte`].
pub(crate) const ISO_8859_9_OVERRIDES: &[(u8, char)] = &[
    (0xD0, '\u{011E}'), // Ğ
    (0xDD, '\u{0130}'), // İ
    (0xDE, '\u{015E}'), // Ş
    (0xF0, '\u{011F}'), // ğ
    (0xFD, '\u{0131}'), // ı
    (0xFE, '\u{015F}'), // ş
];

/// CP850 (DOS Latin-1 / Multilingual) upper half, indexed from 0x80.
pub(crate) const CP850_UPPER: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å', // 80-8F
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', 'ø', '£', 'Ø', '×', 'ƒ', // 90-9F
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '®', '¬', '½', '¼', '¡', '«', '»', // A0-AF
    '░', '▒', '▓', '│', '┤', 'Á', 'Â', 'À', '©', '╣', '║', '╗', '╝', '¢', '¥', '┐', // B0-BF
    '└', '┴', '┬', '├', '─', '┼', 'ã', 'Ã', '╚', '╔', '╩', '╦', '╠', '═', '╬', '¤', // C0-CF
    'ð', 'Ð', 'Ê', 'Ë', 'È', 'ı', 'Í', 'Î', 'Ï', '┘', '┌', '█', '▄', '¦', 'Ì', '▀', // D0-DF
    'Ó', 'ß', 'Ô', 'Ò', 'õ', 'Õ', 'µ', 'þ', 'Þ', 'Ú', 'Û', 'Ù', 'ý', 'Ý', '¯', '´', // E0-EF
    '\u{00AD}', '±', '\u{2017}', '¾', '¶', '§', '÷', '¸', '°', '¨', '·', '¹', '³', '²', '■', '\u{00A0}', // F0-FF
];
