//! Hard token slicing with context buffers.
//!
//! Used only for a unit that is too large to fit any chunk by itself. The
//! unit's tokens are cut into fixed windows of `size` tokens, and each
//! window borrows a few tokens from its neighbours as context.
//!
//! ## How It Works
//!
//! ```text
//! size = 4, before = 1, after = 2
//!
//! Tokens:  a b c d e f g h i j
//!
//! Slice 0: [a b c d]   before: []    after: [e f]
//! Slice 1: [e f g h]   before: [d]   after: [i j]
//! Slice 2: [i j]       before: [h]   after: []    <- final slice may be shorter
//! ```
//!
//! Slices never overlap each other; the buffers are copies of neighbouring
//! tokens, not shared text. The first slice has no `before`, the last has
//! no `after`.

use crate::tokenizer::TokenId;

/// One window of tokens and the neighbouring tokens used as its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSlice<'a> {
    /// The slice's own tokens.
    pub tokens: &'a [TokenId],
    /// Trailing tokens of the previous slice.
    pub before: &'a [TokenId],
    /// Leading tokens of the next slice.
    pub after: &'a [TokenId],
}

/// Cut `tokens` into windows of `size` tokens with context buffers.
///
/// # Panics
///
/// Panics if `size == 0`.
///
/// ```rust
/// use parcels::slice::slice_tokens;
///
/// let tokens: Vec<u32> = (0..10).collect();
/// let slices = slice_tokens(&tokens, 4, 1, 2);
///
/// assert_eq!(slices.len(), 3);
/// assert_eq!(slices[1].tokens, &[4, 5, 6, 7]);
/// assert_eq!(slices[1].before, &[3]);
/// assert_eq!(slices[1].after, &[8, 9]);
/// ```
#[must_use]
pub fn slice_tokens(
    tokens: &[TokenId],
    size: usize,
    buffer_before: usize,
    buffer_after: usize,
) -> Vec<TokenSlice<'_>> {
    assert!(size > 0, "slice size must be > 0");

    let windows: Vec<&[TokenId]> = tokens.chunks(size).collect();

    windows
        .iter()
        .enumerate()
        .map(|(i, &window)| {
            let before = match i.checked_sub(1) {
                Some(prev) => tail(windows[prev], buffer_before),
                None => &[][..],
            };
            let after = match windows.get(i + 1) {
                Some(&next) => &next[..buffer_after.min(next.len())],
                None => &[][..],
            };
            TokenSlice {
                tokens: window,
                before,
                after,
            }
        })
        .collect()
}

fn tail(tokens: &[TokenId], n: usize) -> &[TokenId] {
    &tokens[tokens.len() - n.min(tokens.len())..]
}
