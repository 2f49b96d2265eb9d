//! Declarative program units and their annotation state
//!
//! An [`Entity`] is a script, function/code unit, or field declaration. It
//! owns one AST root plus the side state a downstream analysis needs keyed
//! by node identity: source positions, type annotations, and the
//! control-flow target map for goto-style transfers.
//!
//! Entities nest by explicit registration, not structural containment: the
//! parent records an ordered edge list of (anchor node, child entity) pairs
//! and children carry no parent back-pointers, so ownership stays acyclic.
//! All entities of one translation unit live in one [`Entities`] arena and
//! are addressed by [`EntityId`].

use crate::ir::error::BridgeError;
use crate::ir::location::Position;
use crate::ir::node::NodeId;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// The declarative unit kinds this layer models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EntityKind {
    /// Top-level script of one compilation unit
    Script,
    /// Function or other code unit
    Function,
    /// Field declaration within a class
    Field,
}

/// Declaration modifiers carried by field entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Qualifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Abstract,
    Volatile,
    Transient,
    Native,
}

/// Opaque host type descriptor attached to nodes and entities
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: &str) -> Self {
        TypeRef(name.to_string())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Label disambiguating multiple goto edges leaving one node
///
/// Boolean-derived transfers canonicalize to the fixed `True`/`False`
/// sentinels; everything else is a token label. The unlabeled edge is keyed
/// separately (`None` in the target map) and never aliases a boolean label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum GotoLabel {
    True,
    False,
    Token(String),
}

impl fmt::Display for GotoLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GotoLabel::True => f.write_str("TRUE"),
            GotoLabel::False => f.write_str("FALSE"),
            GotoLabel::Token(t) => f.write_str(t),
        }
    }
}

/// Identity of an entity within one translation unit's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct EntityId(u32);

impl EntityId {
    fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity #{}", self.0)
    }
}

/// Field-specific payload: declaring class, staticness, modifiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldInfo {
    /// Non-owning reference to the declaring class entity
    pub declaring_class: EntityId,
    pub is_static: bool,
    #[serde(serialize_with = "sorted_qualifiers")]
    pub modifiers: HashSet<Qualifier>,
}

// Serialize the modifier set in a fixed order for stable snapshots.
fn sorted_qualifiers<S>(modifiers: &HashSet<Qualifier>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut sorted: Vec<Qualifier> = modifiers.iter().copied().collect();
    sorted.sort();
    sorted.serialize(serializer)
}

/// One declarative unit: name, kind, AST root, and annotation side-tables
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    kind: EntityKind,
    name: Option<String>,
    type_ref: Option<TypeRef>,
    ast: Option<NodeId>,
    location: Option<Position>,
    node_positions: HashMap<NodeId, Position>,
    node_types: HashMap<NodeId, TypeRef>,
    goto_targets: HashMap<(NodeId, Option<GotoLabel>), NodeId>,
    scoped: Vec<(NodeId, EntityId)>,
    field: Option<FieldInfo>,
}

impl Entity {
    fn empty(kind: EntityKind, name: Option<String>) -> Self {
        Entity {
            kind,
            name,
            type_ref: None,
            ast: None,
            location: None,
            node_positions: HashMap::new(),
            node_types: HashMap::new(),
            goto_targets: HashMap::new(),
            scoped: Vec::new(),
            field: None,
        }
    }

    /// A top-level script unit
    pub fn script(name: &str) -> Self {
        Entity::empty(EntityKind::Script, Some(name.to_string()))
    }

    /// A function/code unit
    pub fn function(name: &str) -> Self {
        Entity::empty(EntityKind::Function, Some(name.to_string()))
    }

    /// A field declaration; see `Bridge::make_field_entity` for the
    /// name-from-constant construction path
    pub fn field(
        name: &str,
        declaring_class: EntityId,
        is_static: bool,
        modifiers: HashSet<Qualifier>,
    ) -> Self {
        let mut entity = Entity::empty(EntityKind::Field, Some(name.to_string()));
        entity.field = Some(FieldInfo {
            declaring_class,
            is_static,
            modifiers,
        });
        entity
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn field_info(&self) -> Option<&FieldInfo> {
        self.field.as_ref()
    }
}

// Snapshot serialization: side tables become string-keyed sorted maps so
// JSON output is deterministic across hash seeds.
impl Serialize for Entity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let positions: BTreeMap<String, Position> = self
            .node_positions
            .iter()
            .map(|(node, pos)| (node.to_string(), *pos))
            .collect();
        let types: BTreeMap<String, &TypeRef> = self
            .node_types
            .iter()
            .map(|(node, t)| (node.to_string(), t))
            .collect();
        let gotos: BTreeMap<String, NodeId> = self
            .goto_targets
            .iter()
            .map(|((from, label), to)| {
                let key = match label {
                    None => from.to_string(),
                    Some(label) => format!("{} @ {}", from, label),
                };
                (key, *to)
            })
            .collect();

        let mut state = serializer.serialize_struct("Entity", 10)?;
        state.serialize_field("kind", &self.kind)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.type_ref)?;
        state.serialize_field("ast", &self.ast)?;
        state.serialize_field("location", &self.location)?;
        state.serialize_field("node_positions", &positions)?;
        state.serialize_field("node_types", &types)?;
        state.serialize_field("goto_targets", &gotos)?;
        state.serialize_field("scoped", &self.scoped)?;
        state.serialize_field("field", &self.field)?;
        state.end()
    }
}

/// Arena of entities for one translation unit, plus the nesting relation
#[derive(Debug, Default, Serialize)]
pub struct Entities {
    entities: Vec<Entity>,
}

impl Entities {
    pub fn new() -> Self {
        Entities::default()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Register an entity, handing back its id
    pub fn add(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(entity);
        id
    }

    fn get(&self, id: EntityId) -> Result<&Entity, BridgeError> {
        self.entities
            .get(id.index())
            .ok_or_else(|| BridgeError::ResourceLookupFailure(format!("{} is not bound", id)))
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity, BridgeError> {
        self.entities
            .get_mut(id.index())
            .ok_or_else(|| BridgeError::ResourceLookupFailure(format!("{} is not bound", id)))
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, BridgeError> {
        self.get(id)
    }

    /// Nest `child` within `parent` at `anchor`
    ///
    /// The anchor is expected to belong to the parent's AST; that membership
    /// is the caller's contract and is not validated eagerly.
    pub fn add_scoped_entity(
        &mut self,
        parent: EntityId,
        anchor: NodeId,
        child: EntityId,
    ) -> Result<(), BridgeError> {
        self.get(child)?;
        self.get_mut(parent)?.scoped.push((anchor, child));
        Ok(())
    }

    /// Ordered (anchor, child) nesting edges registered on an entity
    pub fn scoped_entities(&self, id: EntityId) -> Result<&[(NodeId, EntityId)], BridgeError> {
        Ok(&self.get(id)?.scoped)
    }

    pub fn entity_ast(&self, id: EntityId) -> Result<Option<NodeId>, BridgeError> {
        Ok(self.get(id)?.ast)
    }

    /// Attach or replace the owned AST root (late binding is allowed)
    pub fn set_entity_ast(&mut self, id: EntityId, ast: NodeId) -> Result<(), BridgeError> {
        self.get_mut(id)?.ast = Some(ast);
        Ok(())
    }

    pub fn entity_name(&self, id: EntityId) -> Result<&str, BridgeError> {
        self.get(id)?.name.as_deref().ok_or_else(|| {
            BridgeError::ResourceLookupFailure(format!("{} has no name binding", id))
        })
    }

    pub fn entity_type(&self, id: EntityId) -> Result<&TypeRef, BridgeError> {
        self.get(id)?.type_ref.as_ref().ok_or_else(|| {
            BridgeError::ResourceLookupFailure(format!("{} has no type binding", id))
        })
    }

    pub fn set_entity_type(&mut self, id: EntityId, type_ref: TypeRef) -> Result<(), BridgeError> {
        self.get_mut(id)?.type_ref = Some(type_ref);
        Ok(())
    }

    /// The entity's own declaration-level span
    pub fn location(&self, id: EntityId) -> Result<Option<Position>, BridgeError> {
        Ok(self.get(id)?.location)
    }

    pub fn set_location(&mut self, id: EntityId, position: Position) -> Result<(), BridgeError> {
        self.get_mut(id)?.location = Some(position);
        Ok(())
    }

    /// Attach a node's source span; last write wins
    pub fn set_node_position(
        &mut self,
        id: EntityId,
        node: NodeId,
        position: Position,
    ) -> Result<(), BridgeError> {
        self.get_mut(id)?.node_positions.insert(node, position);
        Ok(())
    }

    pub fn node_position(&self, id: EntityId, node: NodeId) -> Result<Option<Position>, BridgeError> {
        Ok(self.get(id)?.node_positions.get(&node).copied())
    }

    /// Attach a node's type annotation; last write wins
    pub fn set_node_type(
        &mut self,
        id: EntityId,
        node: NodeId,
        type_ref: TypeRef,
    ) -> Result<(), BridgeError> {
        self.get_mut(id)?.node_types.insert(node, type_ref);
        Ok(())
    }

    pub fn node_type(&self, id: EntityId, node: NodeId) -> Result<Option<&TypeRef>, BridgeError> {
        Ok(self.get(id)?.node_types.get(&node))
    }

    /// Register the unlabeled control-flow edge `from -> to`
    pub fn set_goto_target(
        &mut self,
        id: EntityId,
        from: NodeId,
        to: NodeId,
    ) -> Result<(), BridgeError> {
        self.get_mut(id)?.goto_targets.insert((from, None), to);
        Ok(())
    }

    /// Register a boolean-derived edge; the flag canonicalizes to the fixed
    /// `True`/`False` label sentinels before delegating to the labeled form
    pub fn set_goto_target_if(
        &mut self,
        id: EntityId,
        from: NodeId,
        to: NodeId,
        flag: bool,
    ) -> Result<(), BridgeError> {
        let label = if flag { GotoLabel::True } else { GotoLabel::False };
        self.set_labeled_goto_target(id, from, to, label)
    }

    /// Register a labeled edge keyed by (from, label); re-registration of
    /// the same key overwrites the prior target
    pub fn set_labeled_goto_target(
        &mut self,
        id: EntityId,
        from: NodeId,
        to: NodeId,
        label: GotoLabel,
    ) -> Result<(), BridgeError> {
        self.get_mut(id)?.goto_targets.insert((from, Some(label)), to);
        Ok(())
    }

    /// Target of the unlabeled edge leaving `from`, if registered
    pub fn goto_target(&self, id: EntityId, from: NodeId) -> Result<Option<NodeId>, BridgeError> {
        Ok(self.get(id)?.goto_targets.get(&(from, None)).copied())
    }

    /// Target of the `(from, label)` edge, if registered
    pub fn labeled_goto_target(
        &self,
        id: EntityId,
        from: NodeId,
        label: &GotoLabel,
    ) -> Result<Option<NodeId>, BridgeError> {
        Ok(self
            .get(id)?
            .goto_targets
            .get(&(from, Some(label.clone())))
            .copied())
    }
}
