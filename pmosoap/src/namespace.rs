//! Arbre d'éléments XML avec résolution de préfixes de namespace
//!
//! Utilitaire indépendant du flux requête/réponse: un nœud appartient à
//! son parent, la référence remontante est faible et ne sert qu'à la
//! résolution de préfixes.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

/// Nœud d'un arbre XML portant des liaisons préfixe → URI.
///
/// Children are owned by their parent; the back-reference is a `Weak`
/// used for lookup only, never for ownership, so dropping the root
/// drops the whole tree without reference cycles.
#[derive(Debug, Default)]
pub struct NamespaceNode {
    namespace: String,
    name: String,
    value: String,
    parent: RefCell<Weak<NamespaceNode>>,
    children: RefCell<Vec<Rc<NamespaceNode>>>,
    bindings: RefCell<HashMap<String, String>>,
}

impl NamespaceNode {
    pub fn new(namespace: &str, name: &str, value: &str) -> Rc<Self> {
        Rc::new(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            value: value.to_string(),
            ..Self::default()
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn parent(&self) -> Option<Rc<NamespaceNode>> {
        self.parent.borrow().upgrade()
    }

    pub fn children(&self) -> Vec<Rc<NamespaceNode>> {
        self.children.borrow().clone()
    }

    /// Attache un enfant à `parent` et câble sa référence remontante.
    pub fn append_child(parent: &Rc<Self>, child: Rc<NamespaceNode>) {
        *child.parent.borrow_mut() = Rc::downgrade(parent);
        parent.children.borrow_mut().push(child);
    }

    /// Déclare une liaison préfixe → URI portée par ce nœud.
    pub fn define_prefix(&self, prefix: &str, uri: &str) {
        self.bindings
            .borrow_mut()
            .insert(prefix.to_string(), uri.to_string());
    }

    /// Résout un préfixe en URI, du nœud vers la racine.
    ///
    /// The nearest definition wins walking up the ancestor chain;
    /// `None` when no ancestor defines the prefix. Pure lookup, no
    /// mutation.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<String> {
        if let Some(uri) = self.bindings.borrow().get(prefix) {
            return Some(uri.clone());
        }
        self.parent.borrow().upgrade()?.resolve_prefix(prefix)
    }
}
