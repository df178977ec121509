//! Per-call cycle guard

use std::ops::{Deref, DerefMut};

use crate::error::{DiError, DiResult};
use crate::types::TypeRef;

/// Types currently being resolved on one call chain, outermost first.
///
/// A fresh frame is created for every top-level resolve and threaded
/// explicitly through the recursion, so concurrent resolutions never see
/// each other's in-flight types.
#[derive(Debug, Default)]
pub struct ResolutionFrame {
    in_flight: Vec<TypeRef>,
}

impl ResolutionFrame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `ty` is an ancestor on the current chain
    pub fn contains(&self, ty: &TypeRef) -> bool {
        self.in_flight.contains(ty)
    }

    /// Number of in-flight types
    pub fn depth(&self) -> usize {
        self.in_flight.len()
    }

    /// Whether nothing is in flight
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// In-flight types, outermost first
    pub fn chain(&self) -> &[TypeRef] {
        &self.in_flight
    }

    /// Push `ty`, failing if it is already in flight.
    ///
    /// The returned guard pops `ty` when dropped, on every exit path.
    pub fn enter(&mut self, ty: &TypeRef) -> DiResult<FrameGuard<'_>> {
        if self.contains(ty) {
            let path = self
                .in_flight
                .iter()
                .chain(std::iter::once(ty))
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(DiError::CircularDependency { path });
        }
        self.in_flight.push(ty.clone());
        Ok(FrameGuard { frame: self })
    }
}

/// Scope of one in-flight type; derefs to the frame for nested resolution
#[derive(Debug)]
pub struct FrameGuard<'a> {
    frame: &'a mut ResolutionFrame,
}

impl Deref for FrameGuard<'_> {
    type Target = ResolutionFrame;

    fn deref(&self) -> &ResolutionFrame {
        self.frame
    }
}

impl DerefMut for FrameGuard<'_> {
    fn deref_mut(&mut self) -> &mut ResolutionFrame {
        self.frame
    }
}

impl Drop for FrameGuard<'_> {
    fn drop(&mut self) {
        self.frame.in_flight.pop();
    }
}
