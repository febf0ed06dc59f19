//! Cross-crate scenarios for the admission engine, wired through the
//! in-memory adapters.

#[cfg(test)]
mod fixtures;
#[cfg(test)]
mod gate;
#[cfg(test)]
mod properties;
#[cfg(test)]
mod scenarios;
