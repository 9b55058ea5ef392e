//! Centralized limits for the schema resolution engine.
//!
//! Resolution recursion is bounded by source nesting because stubs break
//! reference cycles. These limits only catch a front-end that hands us a
//! malformed graph (a parent chain that loops, or an anonymous type that
//! contains itself without going through a named declaration).

// =============================================================================
// Recursion Depth Limits
// =============================================================================

/// Maximum number of parent hops when walking a declaration's lexical
/// ancestry up to its source file.
///
/// Real programs nest namespaces a handful of levels deep:
///
/// ```typescript
/// namespace a.b.c.d { export class X {} }
/// ```
///
/// A walk longer than this means the parent links form a loop.
pub const MAX_ANCESTOR_WALK: u32 = 256;

/// Maximum depth of nested type materialization.
///
/// Each anonymous type literal, signature, tuple, or union adds a frame.
/// Named references do not, since they stop at the stub.
///
/// ```typescript
/// type Deep = { a: { b: { c: { /* ... */ } } } };
/// ```
pub const MAX_MATERIALIZE_DEPTH: u32 = 200;

/// Maximum depth of nested expression materialization (initializers and
/// decorator arguments).
pub const MAX_EXPRESSION_DEPTH: u32 = 200;
