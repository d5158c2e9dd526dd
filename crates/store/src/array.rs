//! Fixed-size collection of independent stores with batched operations.

use std::ops::Index;

use crate::error::{StoreError, check_flux, check_non_negative};
use crate::store::Store;

/// An array of [`Store`]s updated together.
///
/// Batched operations validate every argument before touching any member,
/// so a rejected call leaves the whole array unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreArray {
    stores: Vec<Store>,
}

impl StoreArray {
    /// Creates `count` empty stores without an upper bound.
    pub fn new(count: usize) -> Self {
        Self {
            stores: vec![Store::default(); count],
        }
    }

    /// Number of stores.
    pub fn len(&self) -> usize {
        self.stores.len()
    }

    /// Returns `true` if the array holds no stores.
    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Returns the store at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Store> {
        self.stores.get(index)
    }

    /// Returns a mutable reference to the store at `index`, if any.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Store> {
        self.stores.get_mut(index)
    }

    /// Iterates over the stores in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Store> {
        self.stores.iter()
    }

    /// Replaces every store's quantity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LengthMismatch`] or
    /// [`StoreError::InvariantViolation`]; no store is modified on error.
    pub fn set_quantities(&mut self, quantities: &[f64]) -> Result<(), StoreError> {
        self.check_len(quantities.len())?;
        for &q in quantities {
            check_flux("quantity", q)?;
        }
        for (store, &q) in self.stores.iter_mut().zip(quantities) {
            store.set_quantity(q)?;
        }
        Ok(())
    }

    /// Replaces every store's capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LengthMismatch`] or
    /// [`StoreError::InvariantViolation`]; no store is modified on error.
    pub fn set_capacity(&mut self, capacities: &[f64]) -> Result<(), StoreError> {
        self.check_len(capacities.len())?;
        for &c in capacities {
            check_non_negative("capacity", c)?;
        }
        for (store, &c) in self.stores.iter_mut().zip(capacities) {
            store.set_capacity(c)?;
        }
        Ok(())
    }

    /// Applies `inflow[i]` and `request[i]` to store `i`.
    ///
    /// Returns the total overflow produced by this call.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LengthMismatch`] or
    /// [`StoreError::InvariantViolation`]; no store is modified on error.
    pub fn update(&mut self, inflow: &[f64], request: &[f64]) -> Result<f64, StoreError> {
        self.check_len(inflow.len())?;
        self.check_len(request.len())?;
        for (&i, &r) in inflow.iter().zip(request) {
            check_flux("inflow", i)?;
            check_flux("request", r)?;
        }

        let mut overflow = 0.0;
        for ((store, &i), &r) in self.stores.iter_mut().zip(inflow).zip(request) {
            overflow += store.update(i, r)?.overflow;
        }
        Ok(overflow)
    }

    /// Sum of all store quantities.
    pub fn total_quantity(&self) -> f64 {
        self.stores.iter().map(Store::quantity).sum()
    }

    /// Sum of all store overflows.
    pub fn total_overflow(&self) -> f64 {
        self.stores.iter().map(Store::overflow).sum()
    }

    /// Sum of all store outflows.
    pub fn total_outflow(&self) -> f64 {
        self.stores.iter().map(Store::outflow).sum()
    }

    /// Moves up to `amount` from store `from` into store `to`.
    ///
    /// The source releases what it can (its outflow), and the receiver
    /// takes that as inflow. Anything the receiver cannot hold is recorded
    /// as its overflow. Returns the amount released by `from`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::IndexOutOfRange`] or
    /// [`StoreError::InvariantViolation`]; no store is modified on error.
    pub fn transfer(&mut self, from: usize, to: usize, amount: f64) -> Result<f64, StoreError> {
        let len = self.len();
        for index in [from, to] {
            if index >= len {
                return Err(StoreError::IndexOutOfRange { index, len });
            }
        }
        let amount = check_flux("amount", amount)?;

        let moved = self.stores[from].update(0.0, amount)?.outflow;
        self.stores[to].update(moved, 0.0)?;
        Ok(moved)
    }

    fn check_len(&self, got: usize) -> Result<(), StoreError> {
        if got != self.len() {
            return Err(StoreError::LengthMismatch {
                expected: self.len(),
                got,
            });
        }
        Ok(())
    }
}

impl Index<usize> for StoreArray {
    type Output = Store;

    fn index(&self, index: usize) -> &Store {
        &self.stores[index]
    }
}

impl<'a> IntoIterator for &'a StoreArray {
    type Item = &'a Store;
    type IntoIter = std::slice::Iter<'a, Store>;

    fn into_iter(self) -> Self::IntoIter {
        self.stores.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn three() -> StoreArray {
        let mut a = StoreArray::new(3);
        a.set_capacity(&[1.0, 2.0, 3.0]).unwrap();
        a
    }

    #[test]
    fn new_creates_empty_stores() {
        let a = StoreArray::new(3);
        assert_eq!(a.len(), 3);
        assert_eq!(a.total_quantity(), 0.0);
        assert!(a.iter().all(|s| s.capacity().is_infinite()));
    }

    #[test]
    fn update_returns_total_overflow() {
        let mut a = three();
        let overflow = a.update(&[2.0, 2.0, 2.0], &[0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(overflow, 1.0);
        assert_relative_eq!(a.total_overflow(), 1.0);
        assert_relative_eq!(a.total_quantity(), 5.0);
    }

    #[test]
    fn total_outflow_sums_members() {
        let mut a = three();
        a.set_quantities(&[1.0, 1.0, 1.0]).unwrap();
        a.update(&[0.0, 0.0, 0.0], &[0.5, 2.0, 0.25]).unwrap();
        assert_relative_eq!(a.total_outflow(), 1.75);
        assert_relative_eq!(a.total_quantity(), 1.25);
    }

    #[test]
    fn length_mismatch_rejected() {
        let mut a = three();
        assert_eq!(
            a.update(&[1.0], &[0.0, 0.0, 0.0]),
            Err(StoreError::LengthMismatch {
                expected: 3,
                got: 1
            })
        );
        assert!(a.set_quantities(&[1.0, 1.0]).is_err());
        assert!(a.set_capacity(&[1.0; 4]).is_err());
    }

    #[test]
    fn rejected_batch_is_atomic() {
        let mut a = three();
        a.set_quantities(&[0.5, 0.5, 0.5]).unwrap();
        let before = a.clone();
        assert!(a.update(&[1.0, 1.0, -1.0], &[0.0, 0.0, 0.0]).is_err());
        assert!(a.set_capacity(&[1.0, -2.0, 3.0]).is_err());
        assert!(a.set_quantities(&[1.0, 1.0, f64::NAN]).is_err());
        assert_eq!(a, before);
    }

    #[test]
    fn transfer_moves_available_amount() {
        let mut a = three();
        a.set_quantities(&[1.0, 0.0, 0.0]).unwrap();
        let moved = a.transfer(0, 2, 1.5).unwrap();
        assert_relative_eq!(moved, 1.0);
        assert_eq!(a[0].quantity(), 0.0);
        assert_relative_eq!(a[2].quantity(), 1.0);
    }

    #[test]
    fn transfer_respects_receiver_capacity() {
        let mut a = three();
        a.set_quantities(&[0.0, 0.0, 3.0]).unwrap();
        let moved = a.transfer(2, 0, 3.0).unwrap();
        assert_relative_eq!(moved, 3.0);
        assert_eq!(a[0].quantity(), 1.0);
        assert_relative_eq!(a[0].overflow(), 2.0);
    }

    #[test]
    fn transfer_bad_index_rejected() {
        let mut a = three();
        a.set_quantities(&[1.0, 0.0, 0.0]).unwrap();
        let before = a.clone();
        assert_eq!(
            a.transfer(0, 5, 1.0),
            Err(StoreError::IndexOutOfRange { index: 5, len: 3 })
        );
        assert_eq!(a, before);
    }
}
