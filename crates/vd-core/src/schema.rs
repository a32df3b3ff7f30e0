//! Ordered variable schema for the RMS model.
//!
//! The differential states are `x = (id, iq, Vdc)` and the algebraic unknowns
//! are `y = (Idc, P_ac, Q_ac)`. Both orders are fixed: residual vectors, their
//! Jacobians and every exported table use them. Values live in fixed-size
//! arrays indexed by enum slots, so a vector can never be partially populated.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use std::collections::BTreeMap;

use crate::{Real, VdError, VdResult, max_abs};

/// A named slot of a fixed, ordered variable set.
pub trait Variable: Copy + Eq + fmt::Debug + 'static {
    /// Every slot, in canonical order.
    const ALL: &'static [Self];

    /// Position of this slot in the canonical order.
    fn index(self) -> usize;

    /// External name, as used in input files and exports.
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }
}

pub const N_STATES: usize = 3;
pub const N_ALGEBRAIC: usize = 3;

/// Differential state slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateVar {
    /// Converter d-axis current.
    Id,
    /// Converter q-axis current.
    Iq,
    /// DC link voltage.
    Vdc,
}

impl Variable for StateVar {
    const ALL: &'static [Self] = &[Self::Id, Self::Iq, Self::Vdc];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Iq => "iq",
            Self::Vdc => "Vdc",
        }
    }
}

/// Algebraic slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AlgebraicVar {
    /// DC link current.
    Idc,
    /// Active power at the PCC.
    PAc,
    /// Reactive power at the PCC.
    QAc,
}

impl Variable for AlgebraicVar {
    const ALL: &'static [Self] = &[Self::Idc, Self::PAc, Self::QAc];

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Idc => "Idc",
            Self::PAc => "P_ac",
            Self::QAc => "Q_ac",
        }
    }
}

/// Fixed-size vector addressed by the slots of `V`.
///
/// `N` must equal `V::ALL.len()`; a mismatch fails at compile time the first
/// time a vector of that type is constructed.
pub struct VarVector<V: Variable, const N: usize> {
    values: [Real; N],
    _slots: PhantomData<V>,
}

pub type StateVector = VarVector<StateVar, N_STATES>;
pub type AlgebraicVector = VarVector<AlgebraicVar, N_ALGEBRAIC>;

impl<V: Variable, const N: usize> VarVector<V, N> {
    const CARDINALITY: () = assert!(V::ALL.len() == N, "slot count must match variable set");

    pub fn from_array(values: [Real; N]) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CARDINALITY;
        Self {
            values,
            _slots: PhantomData,
        }
    }

    pub fn zeros() -> Self {
        Self::from_array([0.0; N])
    }

    pub fn from_slice(values: &[Real]) -> VdResult<Self> {
        let array: [Real; N] = values.try_into().map_err(|_| VdError::LengthMismatch {
            what: "variable vector",
            expected: N,
            got: values.len(),
        })?;
        Ok(Self::from_array(array))
    }

    /// Build from a name-keyed map. Every slot must be present and no
    /// unknown names are accepted.
    pub fn from_map(map: &BTreeMap<String, Real>) -> VdResult<Self> {
        if let Some(unknown) = map.keys().find(|k| V::from_name(k).is_none()) {
            return Err(VdError::UnknownVariable {
                name: unknown.clone(),
            });
        }
        let mut out = Self::zeros();
        for &slot in V::ALL {
            let value = map
                .get(slot.name())
                .ok_or_else(|| VdError::MissingVariable {
                    name: slot.name().to_string(),
                })?;
            out[slot] = *value;
        }
        Ok(out)
    }

    pub fn to_map(&self) -> BTreeMap<String, Real> {
        self.iter()
            .map(|(slot, value)| (slot.name().to_string(), value))
            .collect()
    }

    pub fn as_slice(&self) -> &[Real] {
        &self.values
    }

    pub fn to_array(&self) -> [Real; N] {
        self.values
    }

    /// Slots and values in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (V, Real)> + '_ {
        V::ALL.iter().map(move |&slot| (slot, self.values[slot.index()]))
    }

    /// `self + scale * other`, component-wise.
    pub fn add_scaled(&self, other: &Self, scale: Real) -> Self {
        let mut values = self.values;
        for (v, o) in values.iter_mut().zip(other.values.iter()) {
            *v += scale * o;
        }
        Self::from_array(values)
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    pub fn max_abs(&self) -> Real {
        max_abs(&self.values)
    }
}

impl<V: Variable, const N: usize> Clone for VarVector<V, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: Variable, const N: usize> Copy for VarVector<V, N> {}

impl<V: Variable, const N: usize> PartialEq for VarVector<V, N> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl<V: Variable, const N: usize> Default for VarVector<V, N> {
    fn default() -> Self {
        Self::zeros()
    }
}

impl<V: Variable, const N: usize> Index<V> for VarVector<V, N> {
    type Output = Real;

    fn index(&self, slot: V) -> &Real {
        &self.values[slot.index()]
    }
}

impl<V: Variable, const N: usize> IndexMut<V> for VarVector<V, N> {
    fn index_mut(&mut self, slot: V) -> &mut Real {
        &mut self.values[slot.index()]
    }
}

impl<V: Variable, const N: usize> fmt::Debug for VarVector<V, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (slot, value) in self.iter() {
            map.entry(&slot.name(), &value);
        }
        map.finish()
    }
}
