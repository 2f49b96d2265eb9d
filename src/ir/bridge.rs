//! The translator-facing facade
//!
//! A [`Bridge`] bundles everything one translation unit needs: the node
//! arena, the entity arena, the locator service, and a diagnostic sink.
//! Construction calls delegate to the tree and, in verbose mode, echo every
//! successfully built node through the sink as a treeviz render. When the
//! unit is done, [`Bridge::finish`] freezes the state into a
//! [`TranslationUnit`] and hands it to the downstream consumer.

use crate::ir::collections::make_set;
use crate::ir::constant::ConstantValue;
use crate::ir::entity::{Entities, Entity, EntityId, Qualifier};
use crate::ir::error::BridgeError;
use crate::ir::formats::treeviz::to_treeviz_str;
use crate::ir::location::{Locator, Position};
use crate::ir::node::{NodeId, NodeKind};
use crate::ir::tree::Tree;
use serde::Serialize;
use std::io::{self, Write};

/// Destination for diagnostic output
pub trait DiagnosticSink {
    fn emit(&mut self, text: &str) -> io::Result<()>;
}

/// Default sink: standard error, one render per line group
#[derive(Debug, Default)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn emit(&mut self, text: &str) -> io::Result<()> {
        let stderr = io::stderr();
        let mut handle = stderr.lock();
        handle.write_all(text.as_bytes())?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// The frozen result of one translation unit, handed over read-only
#[derive(Debug, Serialize)]
pub struct TranslationUnit {
    pub tree: Tree,
    pub entities: Entities,
}

/// Facade owning the construction state of one translation unit
pub struct Bridge {
    pub tree: Tree,
    pub entities: Entities,
    locator: Box<dyn Locator>,
    sink: Box<dyn DiagnosticSink>,
    verbose: bool,
}

impl Bridge {
    pub fn new(locator: Box<dyn Locator>) -> Self {
        Bridge {
            tree: Tree::new(),
            entities: Entities::new(),
            locator,
            sink: Box::new(StderrSink),
            verbose: false,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Echo every successful construction through the sink
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn log_construction(&mut self, id: NodeId) -> Result<(), BridgeError> {
        if self.verbose {
            self.log(id)?;
        }
        Ok(())
    }

    /// Build an interior node; see [`Tree::make_node`]
    pub fn make_node(&mut self, kind: NodeKind, children: &[NodeId]) -> Result<NodeId, BridgeError> {
        let id = self.tree.make_node(kind, children)?;
        self.log_construction(id)?;
        Ok(id)
    }

    /// Build an "anchor + n-ary" node; see [`Tree::make_node_with`]
    pub fn make_node_with(
        &mut self,
        kind: NodeKind,
        anchor: NodeId,
        rest: &[NodeId],
    ) -> Result<NodeId, BridgeError> {
        let id = self.tree.make_node_with(kind, anchor, rest)?;
        self.log_construction(id)?;
        Ok(id)
    }

    /// Wrap a payload as a constant leaf; see [`Tree::make_constant`]
    pub fn make_constant(
        &mut self,
        value: impl Into<ConstantValue>,
    ) -> Result<NodeId, BridgeError> {
        let id = self.tree.make_constant(value);
        self.log_construction(id)?;
        Ok(id)
    }

    /// Obtain a span token from the locator service
    pub fn make_location(
        &self,
        first_line: u32,
        first_col: u32,
        last_line: u32,
        last_col: u32,
    ) -> Position {
        self.locator
            .make_location(first_line, first_col, last_line, last_col)
    }

    /// Build a field entity from an evaluated name constant
    ///
    /// The name node must be a string constant; its payload becomes the
    /// field's name. The declaring class is referenced, not owned, and the
    /// modifier set is built through the set-bridging operation.
    pub fn make_field_entity(
        &mut self,
        declaring_class: EntityId,
        name: NodeId,
        is_static: bool,
        modifiers: Option<&[Qualifier]>,
    ) -> Result<EntityId, BridgeError> {
        // both bindings must exist before the entity is minted
        self.entities.entity(declaring_class)?;
        let name = self.tree.string_constant_value(name)?.to_string();
        Ok(self.entities.add(Entity::field(
            &name,
            declaring_class,
            is_static,
            make_set(modifiers),
        )))
    }

    /// Render a subtree and emit it to the diagnostic sink
    ///
    /// Sink failures propagate; diagnostics are never silently dropped.
    pub fn log(&mut self, root: NodeId) -> Result<(), BridgeError> {
        let rendered = to_treeviz_str(&self.tree, root);
        self.sink
            .emit(&rendered)
            .map_err(|e| BridgeError::ConstructionFailure(format!("diagnostic sink: {}", e)))
    }

    /// Unconditional failure primitive for internal inconsistencies
    pub fn die<T>(&self, message: &str) -> Result<T, BridgeError> {
        Err(BridgeError::Diagnostic(message.to_string()))
    }

    /// Freeze the construction state and hand it downstream
    pub fn finish(self) -> TranslationUnit {
        TranslationUnit {
            tree: self.tree,
            entities: self.entities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::location::LineColumnLocator;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct CaptureSink {
        lines: Rc<RefCell<Vec<String>>>,
    }

    impl DiagnosticSink for CaptureSink {
        fn emit(&mut self, text: &str) -> io::Result<()> {
            self.lines.borrow_mut().push(text.to_string());
            Ok(())
        }
    }

    struct FailingSink;

    impl DiagnosticSink for FailingSink {
        fn emit(&mut self, _text: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    fn bridge_with_capture() -> (Bridge, CaptureSink) {
        let sink = CaptureSink::default();
        let bridge =
            Bridge::new(Box::new(LineColumnLocator)).with_sink(Box::new(sink.clone()));
        (bridge, sink)
    }

    #[test]
    fn test_verbose_mode_logs_each_construction() {
        let (bridge, sink) = bridge_with_capture();
        let mut bridge = bridge.verbose(true);

        let one = bridge.make_constant(1).unwrap();
        bridge.make_node(NodeKind::ExprStmt, &[one]).unwrap();

        let lines = sink.lines.borrow();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("CONSTANT: 1"));
        assert!(lines[1].contains("EXPR_STMT"));
    }

    #[test]
    fn test_quiet_mode_logs_nothing() {
        let (mut bridge, sink) = bridge_with_capture();
        bridge.make_constant(1).unwrap();
        assert!(sink.lines.borrow().is_empty());
    }

    #[test]
    fn test_sink_failure_propagates() {
        let mut bridge = Bridge::new(Box::new(LineColumnLocator))
            .with_sink(Box::new(FailingSink))
            .verbose(true);
        let err = bridge.make_constant(1).unwrap_err();
        assert!(matches!(err, BridgeError::ConstructionFailure(_)));
    }

    #[test]
    fn test_field_entity_from_name_constant() {
        let (mut bridge, _) = bridge_with_capture();
        let class = bridge.entities.add(Entity::script("Point"));
        let name = bridge.make_constant("x").unwrap();

        let field = bridge
            .make_field_entity(class, name, false, Some(&[Qualifier::Private]))
            .unwrap();

        assert_eq!(bridge.entities.entity_name(field).unwrap(), "x");
        let info = bridge.entities.entity(field).unwrap().field_info().unwrap().clone();
        assert_eq!(info.declaring_class, class);
        assert!(!info.is_static);
        assert!(info.modifiers.contains(&Qualifier::Private));
    }

    #[test]
    fn test_field_entity_rejects_non_string_name() {
        let (mut bridge, _) = bridge_with_capture();
        let class = bridge.entities.add(Entity::script("Point"));
        let name = bridge.make_constant(42).unwrap();
        assert!(matches!(
            bridge.make_field_entity(class, name, true, None),
            Err(BridgeError::TypeViolation { .. })
        ));
    }

    #[test]
    fn test_die_is_always_fatal() {
        let (bridge, _) = bridge_with_capture();
        let result: Result<(), BridgeError> = bridge.die("translator bug: empty loop body");
        assert_eq!(
            result.unwrap_err(),
            BridgeError::Diagnostic("translator bug: empty loop body".to_string())
        );
    }
}
