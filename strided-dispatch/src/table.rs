//! Immutable dtype-signature → kernel tables.

use std::collections::HashMap;

use smallvec::SmallVec;

use crate::dtype::{resolve, DType, DTypeCode};
use crate::error::{DispatchError, Result};
use crate::kernel::Kernel;
use crate::MAX_OPERANDS;

/// Bits per dtype code in a packed signature key.
const CODE_BITS: u32 = 4;

/// Pack one signature (one code per operand) into a `u64` key.
fn pack_key(codes: impl IntoIterator<Item = DTypeCode>) -> u64 {
    codes
        .into_iter()
        .fold(0u64, |key, c| (key << CODE_BITS) | c.get() as u64)
}

/// Exact-match lookup from operand dtype signatures to kernels, with a
/// fallback kernel that handles every signature.
///
/// Built once and never mutated; share it behind an `Arc` or a `static`.
#[derive(Debug)]
pub struct DispatchTable {
    nin: usize,
    nout: usize,
    signatures: Vec<SmallVec<[DType; 4]>>,
    kernels: Vec<Kernel>,
    fallback: Kernel,
    index: HashMap<u64, usize>,
}

impl DispatchTable {
    /// Build a table.
    ///
    /// `types` is the row-major flattening of one signature per kernel, each
    /// `nin + nout` dtypes long (inputs first). Typed kernels must store
    /// every dtype of their row (see [`Kernel::accepts`]). When a signature
    /// appears more than once, the first kernel wins.
    pub fn new(
        types: &[DType],
        kernels: Vec<Kernel>,
        fallback: Kernel,
        nin: usize,
        nout: usize,
    ) -> Result<Self> {
        let width = nin + nout;
        if width == 0 || width > MAX_OPERANDS {
            return Err(DispatchError::InvalidTable(format!(
                "operand count must be between 1 and {MAX_OPERANDS}, got {width}"
            )));
        }
        if types.len() != kernels.len() * width {
            return Err(DispatchError::InvalidTable(format!(
                "{} kernels need {} dtypes, got {}",
                kernels.len(),
                kernels.len() * width,
                types.len()
            )));
        }
        for (i, k) in kernels.iter().enumerate() {
            if (k.nin(), k.nout()) != (nin, nout) {
                return Err(DispatchError::InvalidTable(format!(
                    "kernel {i} takes {} inputs and {} outputs, table expects {nin} and {nout}",
                    k.nin(),
                    k.nout()
                )));
            }
        }
        for (i, (kernel, sig)) in kernels.iter().zip(types.chunks(width)).enumerate() {
            if let Some((k, dtype)) = sig.iter().enumerate().find(|&(k, &d)| !kernel.accepts(k, d))
            {
                return Err(DispatchError::InvalidTable(format!(
                    "kernel {i} cannot run on {dtype} storage at operand {k}"
                )));
            }
        }
        if (fallback.nin(), fallback.nout()) != (nin, nout) {
            return Err(DispatchError::InvalidTable(format!(
                "fallback takes {} inputs and {} outputs, table expects {nin} and {nout}",
                fallback.nin(),
                fallback.nout()
            )));
        }

        let signatures: Vec<SmallVec<[DType; 4]>> = types
            .chunks(width)
            .map(|sig| sig.iter().copied().collect())
            .collect();
        let mut index = HashMap::with_capacity(signatures.len());
        for (i, sig) in signatures.iter().enumerate() {
            index
                .entry(pack_key(sig.iter().map(|d| d.code())))
                .or_insert(i);
        }
        log::trace!(
            "built dispatch table: {} signatures ({} distinct), nin={nin}, nout={nout}",
            signatures.len(),
            index.len()
        );

        Ok(Self {
            nin,
            nout,
            signatures,
            kernels,
            fallback,
            index,
        })
    }

    /// Build a table from dtype tags.
    ///
    /// Unlike call-time resolution, an unknown tag here is an error: a
    /// table entry for an unknown type could never match.
    pub fn from_tags(
        tags: &[&str],
        kernels: Vec<Kernel>,
        fallback: Kernel,
        nin: usize,
        nout: usize,
    ) -> Result<Self> {
        let types = tags
            .iter()
            .map(|t| {
                resolve(t)
                    .dtype()
                    .ok_or_else(|| DispatchError::UnknownDType(t.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(&types, kernels, fallback, nin, nout)
    }

    #[inline]
    pub fn nin(&self) -> usize {
        self.nin
    }

    #[inline]
    pub fn nout(&self) -> usize {
        self.nout
    }

    /// Registered signatures, in registration order.
    pub fn signatures(&self) -> impl Iterator<Item = &[DType]> {
        self.signatures.iter().map(|s| s.as_slice())
    }

    /// Index of the kernel registered for an exact code signature.
    ///
    /// Signatures of the wrong width, or containing
    /// [`DTypeCode::UNKNOWN`], never match.
    pub fn lookup(&self, codes: &[DTypeCode]) -> Option<usize> {
        if codes.len() != self.nin + self.nout || codes.iter().any(|c| c.is_unknown()) {
            return None;
        }
        self.index.get(&pack_key(codes.iter().copied())).copied()
    }

    /// Kernel at a signature index.
    pub fn kernel(&self, i: usize) -> Option<&Kernel> {
        self.kernels.get(i)
    }

    /// Registered kernels, in registration order.
    pub fn kernels(&self) -> &[Kernel] {
        &self.kernels
    }

    pub fn fallback(&self) -> &Kernel {
        &self.fallback
    }

    /// The kernel for a signature: the exact match if registered, otherwise
    /// the fallback.
    pub fn select(&self, codes: &[DTypeCode]) -> (&Kernel, Option<usize>) {
        match self.lookup(codes) {
            Some(i) => (&self.kernels[i], Some(i)),
            None => (&self.fallback, None),
        }
    }
}
