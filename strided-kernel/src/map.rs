//! Elementwise strided maps.
//!
//! Each kernel comes in two calling forms:
//! - simple: `(n, x, stride_x, y, stride_y, ...)`, where a negative stride
//!   starts at the far end of its buffer
//! - `_ndarray`: `(n, x, stride_x, offset_x, y, stride_y, offset_y, ...)`
//!   with explicit starting offsets
//!
//! `n == 0` is a no-op. All operands are bounds-checked before any write.

use strided_view::{stride_to_offset, Result};

use crate::kernel::StridedIndices;

// ============================================================================
// Nullary
// ============================================================================

/// `y[i] = f()`.
pub fn nullary<T>(n: usize, y: &mut [T], stride_y: isize, f: impl FnMut() -> T) -> Result<()> {
    nullary_ndarray(n, y, stride_y, stride_to_offset(n, stride_y), f)
}

/// [`nullary`] with an explicit offset.
pub fn nullary_ndarray<T>(
    n: usize,
    y: &mut [T],
    stride_y: isize,
    offset_y: isize,
    mut f: impl FnMut() -> T,
) -> Result<()> {
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    if let Some(start) = iy.unit_run() {
        for d in &mut y[start..start + n] {
            *d = f();
        }
        return Ok(());
    }
    for i in iy {
        y[i] = f();
    }
    Ok(())
}

// ============================================================================
// Unary
// ============================================================================

/// `y[i] = f(x[i])`.
pub fn unary<A: Copy, B>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &mut [B],
    stride_y: isize,
    f: impl FnMut(A) -> B,
) -> Result<()> {
    unary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        f,
    )
}

/// [`unary`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn unary_ndarray<A: Copy, B>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &mut [B],
    stride_y: isize,
    offset_y: isize,
    mut f: impl FnMut(A) -> B,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    if let (Some(sx), Some(sy)) = (ix.unit_run(), iy.unit_run()) {
        // Contiguous fast path: slice iteration auto-vectorizes.
        for (d, &s) in y[sy..sy + n].iter_mut().zip(&x[sx..sx + n]) {
            *d = f(s);
        }
        return Ok(());
    }
    for (i, j) in ix.zip(iy) {
        y[j] = f(x[i]);
    }
    Ok(())
}

// ============================================================================
// Binary / ternary
// ============================================================================

/// `z[i] = f(x[i], y[i])`.
#[allow(clippy::too_many_arguments)]
pub fn binary<A: Copy, B: Copy, C>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &[B],
    stride_y: isize,
    z: &mut [C],
    stride_z: isize,
    f: impl FnMut(A, B) -> C,
) -> Result<()> {
    binary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        z,
        stride_z,
        stride_to_offset(n, stride_z),
        f,
    )
}

/// [`binary`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn binary_ndarray<A: Copy, B: Copy, C>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &[B],
    stride_y: isize,
    offset_y: isize,
    z: &mut [C],
    stride_z: isize,
    offset_z: isize,
    mut f: impl FnMut(A, B) -> C,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    let iz = StridedIndices::new(z.len(), n, stride_z, offset_z)?;
    if let (Some(sx), Some(sy), Some(sz)) = (ix.unit_run(), iy.unit_run(), iz.unit_run()) {
        for ((d, &a), &b) in z[sz..sz + n]
            .iter_mut()
            .zip(&x[sx..sx + n])
            .zip(&y[sy..sy + n])
        {
            *d = f(a, b);
        }
        return Ok(());
    }
    for ((i, j), k) in ix.zip(iy).zip(iz) {
        z[k] = f(x[i], y[j]);
    }
    Ok(())
}

/// `w[i] = f(x[i], y[i], z[i])`.
#[allow(clippy::too_many_arguments)]
pub fn ternary<A: Copy, B: Copy, C: Copy, D>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &[B],
    stride_y: isize,
    z: &[C],
    stride_z: isize,
    w: &mut [D],
    stride_w: isize,
    f: impl FnMut(A, B, C) -> D,
) -> Result<()> {
    ternary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        z,
        stride_z,
        stride_to_offset(n, stride_z),
        w,
        stride_w,
        stride_to_offset(n, stride_w),
        f,
    )
}

/// [`ternary`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn ternary_ndarray<A: Copy, B: Copy, C: Copy, D>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &[B],
    stride_y: isize,
    offset_y: isize,
    z: &[C],
    stride_z: isize,
    offset_z: isize,
    w: &mut [D],
    stride_w: isize,
    offset_w: isize,
    mut f: impl FnMut(A, B, C) -> D,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    let iz = StridedIndices::new(z.len(), n, stride_z, offset_z)?;
    let iw = StridedIndices::new(w.len(), n, stride_w, offset_w)?;
    for (((i, j), k), l) in ix.zip(iy).zip(iz).zip(iw) {
        w[l] = f(x[i], y[j], z[k]);
    }
    Ok(())
}

/// `v[i] = f(x[i], y[i], z[i], w[i])`.
#[allow(clippy::too_many_arguments)]
pub fn quaternary<A: Copy, B: Copy, C: Copy, D: Copy, E>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &[B],
    stride_y: isize,
    z: &[C],
    stride_z: isize,
    w: &[D],
    stride_w: isize,
    v: &mut [E],
    stride_v: isize,
    f: impl FnMut(A, B, C, D) -> E,
) -> Result<()> {
    quaternary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        z,
        stride_z,
        stride_to_offset(n, stride_z),
        w,
        stride_w,
        stride_to_offset(n, stride_w),
        v,
        stride_v,
        stride_to_offset(n, stride_v),
        f,
    )
}

/// [`quaternary`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn quaternary_ndarray<A: Copy, B: Copy, C: Copy, D: Copy, E>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &[B],
    stride_y: isize,
    offset_y: isize,
    z: &[C],
    stride_z: isize,
    offset_z: isize,
    w: &[D],
    stride_w: isize,
    offset_w: isize,
    v: &mut [E],
    stride_v: isize,
    offset_v: isize,
    mut f: impl FnMut(A, B, C, D) -> E,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    let iz = StridedIndices::new(z.len(), n, stride_z, offset_z)?;
    let iw = StridedIndices::new(w.len(), n, stride_w, offset_w)?;
    let iv = StridedIndices::new(v.len(), n, stride_v, offset_v)?;
    for ((((i, j), k), l), m) in ix.zip(iy).zip(iz).zip(iw).zip(iv) {
        v[m] = f(x[i], y[j], z[k], w[l]);
    }
    Ok(())
}

/// `v[i] = f(x[i], y[i], z[i], w[i], u[i])`.
#[allow(clippy::too_many_arguments)]
pub fn quinary<A: Copy, B: Copy, C: Copy, D: Copy, E: Copy, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &[B],
    stride_y: isize,
    z: &[C],
    stride_z: isize,
    w: &[D],
    stride_w: isize,
    u: &[E],
    stride_u: isize,
    v: &mut [F],
    stride_v: isize,
    f: impl FnMut(A, B, C, D, E) -> F,
) -> Result<()> {
    quinary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        z,
        stride_z,
        stride_to_offset(n, stride_z),
        w,
        stride_w,
        stride_to_offset(n, stride_w),
        u,
        stride_u,
        stride_to_offset(n, stride_u),
        v,
        stride_v,
        stride_to_offset(n, stride_v),
        f,
    )
}

/// [`quinary`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn quinary_ndarray<A: Copy, B: Copy, C: Copy, D: Copy, E: Copy, F>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &[B],
    stride_y: isize,
    offset_y: isize,
    z: &[C],
    stride_z: isize,
    offset_z: isize,
    w: &[D],
    stride_w: isize,
    offset_w: isize,
    u: &[E],
    stride_u: isize,
    offset_u: isize,
    v: &mut [F],
    stride_v: isize,
    offset_v: isize,
    mut f: impl FnMut(A, B, C, D, E) -> F,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    let iz = StridedIndices::new(z.len(), n, stride_z, offset_z)?;
    let iw = StridedIndices::new(w.len(), n, stride_w, offset_w)?;
    let iu = StridedIndices::new(u.len(), n, stride_u, offset_u)?;
    let iv = StridedIndices::new(v.len(), n, stride_v, offset_v)?;
    for (((((i, j), k), l), m), o) in ix.zip(iy).zip(iz).zip(iw).zip(iu).zip(iv) {
        v[o] = f(x[i], y[j], z[k], w[l], u[m]);
    }
    Ok(())
}

// ============================================================================
// Masked and accessor maps
// ============================================================================

/// `y[i] = f(x[i])` where `mask[i] == 0`; masked elements leave `y` untouched.
#[allow(clippy::too_many_arguments)]
pub fn mskunary<A: Copy, B>(
    n: usize,
    x: &[A],
    stride_x: isize,
    mask: &[u8],
    stride_mask: isize,
    y: &mut [B],
    stride_y: isize,
    f: impl FnMut(A) -> B,
) -> Result<()> {
    mskunary_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        mask,
        stride_mask,
        stride_to_offset(n, stride_mask),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        f,
    )
}

/// [`mskunary`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn mskunary_ndarray<A: Copy, B>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    mask: &[u8],
    stride_mask: isize,
    offset_mask: isize,
    y: &mut [B],
    stride_y: isize,
    offset_y: isize,
    mut f: impl FnMut(A) -> B,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let im = StridedIndices::new(mask.len(), n, stride_mask, offset_mask)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    for ((i, m), j) in ix.zip(im).zip(iy) {
        if mask[m] == 0 {
            y[j] = f(x[i]);
        }
    }
    Ok(())
}

/// `y[i] = f(access(x[i], i))`, skipping elements for which the accessor
/// returns `None` (their output slot is left untouched).
#[allow(clippy::too_many_arguments)]
pub fn unary_by<A: Copy, B>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &mut [B],
    stride_y: isize,
    f: impl FnMut(A) -> B,
    access: impl FnMut(A, usize) -> Option<A>,
) -> Result<()> {
    unary_by_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        f,
        access,
    )
}

/// [`unary_by`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn unary_by_ndarray<A: Copy, B>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &mut [B],
    stride_y: isize,
    offset_y: isize,
    mut f: impl FnMut(A) -> B,
    mut access: impl FnMut(A, usize) -> Option<A>,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    for (k, (i, j)) in ix.zip(iy).enumerate() {
        if let Some(v) = access(x[i], k) {
            y[j] = f(v);
        }
    }
    Ok(())
}

/// `z[i] = f(access((x[i], y[i]), i))`, skipping elements for which the
/// accessor returns `None`.
#[allow(clippy::too_many_arguments)]
pub fn binary_by<A: Copy, B: Copy, C>(
    n: usize,
    x: &[A],
    stride_x: isize,
    y: &[B],
    stride_y: isize,
    z: &mut [C],
    stride_z: isize,
    f: impl FnMut(A, B) -> C,
    access: impl FnMut((A, B), usize) -> Option<(A, B)>,
) -> Result<()> {
    binary_by_ndarray(
        n,
        x,
        stride_x,
        stride_to_offset(n, stride_x),
        y,
        stride_y,
        stride_to_offset(n, stride_y),
        z,
        stride_z,
        stride_to_offset(n, stride_z),
        f,
        access,
    )
}

/// [`binary_by`] with explicit offsets.
#[allow(clippy::too_many_arguments)]
pub fn binary_by_ndarray<A: Copy, B: Copy, C>(
    n: usize,
    x: &[A],
    stride_x: isize,
    offset_x: isize,
    y: &[B],
    stride_y: isize,
    offset_y: isize,
    z: &mut [C],
    stride_z: isize,
    offset_z: isize,
    mut f: impl FnMut(A, B) -> C,
    mut access: impl FnMut((A, B), usize) -> Option<(A, B)>,
) -> Result<()> {
    let ix = StridedIndices::new(x.len(), n, stride_x, offset_x)?;
    let iy = StridedIndices::new(y.len(), n, stride_y, offset_y)?;
    let iz = StridedIndices::new(z.len(), n, stride_z, offset_z)?;
    for (k, ((i, j), l)) in ix.zip(iy).zip(iz).enumerate() {
        if let Some((a, b)) = access((x[i], y[j]), k) {
            z[l] = f(a, b);
        }
    }
    Ok(())
}
