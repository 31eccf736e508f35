/// Where in the surrounding structure a value is being parsed.
///
/// Drives terminator selection for unquoted text and the `null{...}`
/// recovery gate. Expressed here as a parameter threaded through the
/// recursive-descent calls rather than a single mutable field on one flat
/// loop — the call graph itself carries the position in the grammar the
/// way a hand-rolled state machine would track it on a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Top level, or any position with no surrounding collection.
    Nothing,
    /// Parsing an object's key, before the colon.
    ObjectKey,
    /// Parsing an object's value, after the colon.
    ObjectValue,
    /// Parsing an array element.
    Array,
}
