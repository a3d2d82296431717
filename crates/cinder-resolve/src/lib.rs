// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Scope building and name binding for the Cinder language.
//!
//! [`build`] walks a parsed module and records its lexical structure as a
//! [`SymbolTree`]; [`bind`] then resolves every name reference in it.

mod bind;
mod error;
mod print;
mod scope;
mod symbol;

pub use bind::bind;
pub use error::{ResolveError, ResolveErrorKind};
pub use print::dump;
pub use scope::{build, BuildOptions, PRELUDE};
pub use symbol::{Symbol, SymbolId, SymbolKind, SymbolTree};

use std::collections::HashMap;

use cinder_ast::{Ast, NodeId, StringTable};

/// The result of scope building and binding.
#[derive(Debug)]
pub struct Resolved {
    pub tree: SymbolTree,
    /// Scope symbol of the module.
    pub module: SymbolId,
    /// Declaration each bound `Name` node refers to.
    pub resolutions: HashMap<NodeId, SymbolId>,
    pub errors: Vec<ResolveError>,
}

/// Build and bind the symbol tree of the module at `root`.
pub fn resolve(ast: &Ast, strings: &mut StringTable, root: NodeId, options: BuildOptions) -> Resolved {
    let (mut tree, module) = build(ast, strings, root, options);
    let errors = bind(&mut tree, strings);
    let resolutions = tree
        .iter()
        .filter_map(|symbol| symbol.binding.map(|declaration| (symbol.node, declaration)))
        .collect();
    Resolved { tree, module, resolutions, errors }
}
