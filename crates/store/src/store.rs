//! Bounded mass-balance accumulator.

use crate::error::{StoreError, check_flux, check_non_negative};

/// Fluxes produced by a single [`Store::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StoreFlux {
    /// Amount spilled because the store reached capacity.
    pub overflow: f64,
    /// Amount actually released (never more than the request).
    pub outflow: f64,
}

/// A storage element with a lower bound of zero and an upper bound of
/// `capacity`.
///
/// Every mutation keeps `0 <= quantity <= capacity`. Content pushed above
/// capacity is reported as `overflow`; a request larger than the available
/// content is cut back and reported as a reduced `outflow`.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    quantity: f64,
    capacity: f64,
    inflow: f64,
    request: f64,
    overflow: f64,
    outflow: f64,
}

impl Store {
    /// Creates a store holding `quantity` with upper bound `capacity`.
    ///
    /// A starting quantity above capacity is clamped and the excess is
    /// recorded as overflow.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvariantViolation`] if either value is negative
    /// or NaN, or if `quantity` is infinite.
    pub fn new(quantity: f64, capacity: f64) -> Result<Self, StoreError> {
        let quantity = check_flux("quantity", quantity)?;
        let capacity = check_non_negative("capacity", capacity)?;
        let mut store = Self {
            quantity,
            capacity: f64::INFINITY,
            ..Self::default()
        };
        store.set_capacity(capacity)?;
        Ok(store)
    }

    /// Creates an empty store with the given capacity.
    pub fn with_capacity(capacity: f64) -> Result<Self, StoreError> {
        Self::new(0.0, capacity)
    }

    /// Current content.
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Upper bound on content.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Excess spilled by the last effective update or capacity change.
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Amount released by the last effective update.
    pub fn outflow(&self) -> f64 {
        self.outflow
    }

    /// Inflow applied by the last effective update.
    pub fn inflow(&self) -> f64 {
        self.inflow
    }

    /// Outflow requested by the last effective update.
    pub fn request(&self) -> f64 {
        self.request
    }

    /// True when the store is at its upper bound.
    pub fn is_full(&self) -> bool {
        self.quantity >= self.capacity
    }

    /// True when the store is at its lower bound.
    pub fn is_empty(&self) -> bool {
        self.quantity <= 0.0
    }

    /// Applies `inflow` and `request` to the store.
    ///
    /// The new quantity is `clamp(quantity + inflow - request, 0, capacity)`.
    /// Content above capacity becomes overflow. When the request exceeds
    /// what is available, outflow is reduced by the shortfall.
    ///
    /// `update(0.0, 0.0)` leaves the store untouched and returns a zero flux.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvariantViolation`] if either argument is
    /// negative or not finite. The store is not modified in that case.
    pub fn update(&mut self, inflow: f64, request: f64) -> Result<StoreFlux, StoreError> {
        let inflow = check_flux("inflow", inflow)?;
        let request = check_flux("request", request)?;
        if inflow == 0.0 && request == 0.0 {
            return Ok(StoreFlux::default());
        }

        self.inflow = inflow;
        self.request = request;

        let mut next = self.quantity + (inflow - request);

        if next > self.capacity {
            self.overflow = next - self.capacity;
            next = self.capacity;
        } else {
            self.overflow = 0.0;
        }

        if next < 0.0 {
            // `next` holds the unmet part of the request.
            self.outflow = request + next;
            next = 0.0;
        } else {
            self.outflow = request;
        }

        self.quantity = next;
        Ok(StoreFlux {
            overflow: self.overflow,
            outflow: self.outflow,
        })
    }

    /// Replaces the upper bound.
    ///
    /// Shrinking below the current quantity spills the difference into
    /// `overflow` immediately; otherwise `overflow` is reset to zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvariantViolation`] if `capacity` is negative
    /// or NaN.
    pub fn set_capacity(&mut self, capacity: f64) -> Result<(), StoreError> {
        let capacity = check_non_negative("capacity", capacity)?;
        if capacity < self.quantity {
            self.overflow = self.quantity - capacity;
            self.quantity = capacity;
        } else {
            self.overflow = 0.0;
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Replaces the current content, clamping it to capacity.
    ///
    /// Any amount above capacity is recorded as overflow.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvariantViolation`] if `quantity` is negative
    /// or not finite.
    pub fn set_quantity(&mut self, quantity: f64) -> Result<(), StoreError> {
        let quantity = check_flux("quantity", quantity)?;
        if quantity > self.capacity {
            self.overflow = quantity - self.capacity;
            self.quantity = self.capacity;
        } else {
            self.overflow = 0.0;
            self.quantity = quantity;
        }
        Ok(())
    }
}

impl Default for Store {
    /// An empty store without an upper bound.
    fn default() -> Self {
        Self {
            quantity: 0.0,
            capacity: f64::INFINITY,
            inflow: 0.0,
            request: 0.0,
            overflow: 0.0,
            outflow: 0.0,
        }
    }
}
