//! Binary scene persistence.
//!
//! Serializes a whole [`Universe`] to a byte stream and reconstructs it in
//! two phases:
//!
//! 1. **Read**: records stream back into per-type state adapters. Nothing
//!    live is built yet; cross-references are parked in the
//!    [`SymbolTable`](symbols::SymbolTable) by ID, so forward and shared
//!    references cost nothing extra.
//! 2. **Build**: every adapter's `build` hook runs exactly once, resolving
//!    parked references (construction is lazy and happens at first
//!    resolve). Only after the full graph exists does the attachment phase
//!    wire reconstructed branch graphs onto their locales.
//!
//! A failed read leaves the partially-built universe in an undefined state;
//! callers must discard it and must not retry on the same session.
//!
//! # Stream layout
//!
//! ```text
//! "ORRY" | version u32 | locale_count i32
//!   per locale: hires coord | branch_count i32 | node records
//! ```
//!
//! Node records are `tag u8 | id u32 | payload`, written depth-first; the
//! per-locale root IDs double as the attachment index.

pub mod codec;
pub(crate) mod controller;
pub(crate) mod states;
pub mod symbols;

use std::io::{Read, Write};

use crate::errors::{OrreryError, Result};
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::controller::{BuildContext, ReadSession, WriteSession};
use crate::persist::symbols::{LiveRef, SymbolId, SymbolTable};
use crate::scene::{Locale, LocaleKey, NodeKey, Universe};

const MAGIC: &[u8; 4] = b"ORRY";
const VERSION: u32 = 1;

/// Serializes `universe` to `out`.
///
/// IDs are assigned at first sight during traversal, so serializing the
/// same universe twice produces identical bytes.
pub fn save_universe<W: Write>(universe: &Universe, mut out: W) -> Result<()> {
    let mut w = SceneWriter::new(&mut out);
    w.write_bytes(MAGIC)?;
    w.write_u32(VERSION)?;

    let mut sess = WriteSession::new(universe);
    w.write_len(universe.locale_count())?;
    for (_, locale) in universe.locales() {
        w.write_hires(&locale.hi_res)?;
        w.write_len(locale.branch_graphs().len())?;
        for &root in locale.branch_graphs() {
            sess.write_node(&mut w, root)?;
        }
    }

    // Every referenced symbol must have had its payload emitted somewhere
    // in the stream, or the reader could never materialize it.
    if let Some(id) = sess.symbols.first_unwritten() {
        return Err(OrreryError::UnresolvedSymbol(id.raw()));
    }
    log::debug!("saved universe: {} symbols", sess.symbols.allocated());
    Ok(())
}

/// Reconstructs a universe from `input`.
pub fn load_universe<R: Read>(mut input: R) -> Result<Universe> {
    let mut r = SceneReader::new(&mut input);
    let mut magic = [0u8; 4];
    r.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(OrreryError::BadMagic);
    }
    let version = r.read_u32()?;
    if version != VERSION {
        return Err(OrreryError::UnsupportedVersion(version));
    }

    // Phase 1: stream everything into state records.
    let mut sess = ReadSession::new();
    let mut locale_roots: Vec<(LocaleKey, Vec<SymbolId>)> = Vec::new();
    let locale_count = r.read_len()?;
    for _ in 0..locale_count {
        let hi_res = r.read_hires()?;
        let locale = sess.universe.add_locale(Locale::new(hi_res));
        let branch_count = r.read_len()?;
        let mut roots = Vec::with_capacity(branch_count.min(1 << 16));
        for _ in 0..branch_count {
            roots.push(sess.read_node(&mut r)?);
        }
        locale_roots.push((locale, roots));
    }

    // Phase 2: construct every recorded symbol, then run every build hook
    // exactly once. Order is the stream's record order; lazy resolution
    // makes it irrelevant.
    let ReadSession {
        mut universe,
        mut symbols,
        states,
    } = sess;
    {
        let mut ctx = BuildContext {
            universe: &mut universe,
            symbols: &mut symbols,
            states: &states,
        };
        for id in ctx.symbols.recorded_ids() {
            ctx.resolve(id)?;
        }
        for state in &states {
            state.build(&mut ctx)?;
        }
    }
    log::debug!("loaded universe: {} state records", states.len());

    // Attachment phase: only now does the universe gain visible content.
    for (locale, roots) in locale_roots {
        for id in roots {
            let root = attached_node(&symbols, id)?;
            universe.attach_branch_graph(locale, root)?;
        }
    }
    Ok(universe)
}

fn attached_node(symbols: &SymbolTable, id: SymbolId) -> Result<NodeKey> {
    match symbols.lookup(id) {
        Some(LiveRef::Node(key)) => Ok(key),
        Some(LiveRef::Geometry(_)) => Err(OrreryError::SymbolKindMismatch {
            id: id.raw(),
            expected: "node",
        }),
        None => Err(OrreryError::UnresolvedSymbol(id.raw())),
    }
}
