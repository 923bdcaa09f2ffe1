//! Marker types distinguishing values of the same shape.

/// Marker of an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker of the first day of a date range.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker of the last day of a date range.
#[derive(Clone, Copy, Debug)]
pub struct End;
