//! `NodeArena`: flat node storage with typed accessors.
//!
//! Nodes are built bottom-up; `add_node` sets the parent link of every
//! child it references, so a parent is always created after its children.

use crate::base::NodeIndex;
use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use tsschema_common::limits::MAX_ANCESTOR_WALK;

#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

macro_rules! typed_getters {
    ($($fn_name:ident => $variant:ident($data:ty)),* $(,)?) => {
        $(
            #[inline]
            pub fn $fn_name(&self, idx: NodeIndex) -> Option<&$data> {
                match &self.get(idx)?.data {
                    NodeData::$variant(data) => Some(data),
                    _ => None,
                }
            }
        )*
    };
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ============================================================================
    // Node Creation Methods
    // ============================================================================

    /// Append a node and link its children to it.
    pub fn add_node(&mut self, kind: SyntaxKind, data: NodeData) -> NodeIndex {
        let idx = NodeIndex(self.nodes.len() as u32);
        let children = children_of(&data);
        self.nodes.push(Node {
            kind,
            flags: node_flags::NONE,
            modifiers: ModifierFlags::empty(),
            parent: NodeIndex::NONE,
            data,
        });
        for child in children {
            self.set_parent(child, idx);
        }
        idx
    }

    #[inline]
    fn set_parent(&mut self, child: NodeIndex, parent: NodeIndex) {
        if child.is_some()
            && let Some(node) = self.nodes.get_mut(child.0 as usize)
        {
            node.parent = parent;
        }
    }

    pub fn set_modifiers(&mut self, idx: NodeIndex, modifiers: ModifierFlags) {
        if let Some(node) = self.nodes.get_mut(idx.0 as usize) {
            node.modifiers = modifiers;
        }
    }

    pub fn set_flags(&mut self, idx: NodeIndex, flags: u16) {
        if let Some(node) = self.nodes.get_mut(idx.0 as usize) {
            node.flags = flags;
        }
    }

    // ============================================================================
    // Access
    // ============================================================================

    #[inline]
    pub fn get(&self, idx: NodeIndex) -> Option<&Node> {
        if idx.is_none() {
            return None;
        }
        self.nodes.get(idx.0 as usize)
    }

    #[inline]
    pub fn kind(&self, idx: NodeIndex) -> Option<SyntaxKind> {
        self.get(idx).map(|node| node.kind)
    }

    #[inline]
    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.get(idx).map(|node| node.parent).unwrap_or(NodeIndex::NONE)
    }

    pub fn modifiers(&self, idx: NodeIndex) -> ModifierFlags {
        self.get(idx).map(|node| node.modifiers).unwrap_or_default()
    }

    pub fn flags(&self, idx: NodeIndex) -> u16 {
        self.get(idx).map(|node| node.flags).unwrap_or(node_flags::NONE)
    }

    typed_getters! {
        get_source_file => SourceFile(SourceFileData),
        get_identifier => Identifier(IdentifierData),
        get_qualified_name => QualifiedName(QualifiedNameData),
        get_computed_property => ComputedProperty(ComputedPropertyData),
        get_literal => Literal(LiteralData),
        get_module => Module(ModuleData),
        get_module_block => ModuleBlock(ModuleBlockData),
        get_class => Class(ClassData),
        get_interface => Interface(InterfaceData),
        get_enum => Enum(EnumData),
        get_enum_member => EnumMember(EnumMemberData),
        get_type_alias => TypeAlias(TypeAliasData),
        get_function => Function(FunctionData),
        get_variable_statement => VariableStatement(VariableStatementData),
        get_variable_declaration => VariableDeclaration(VariableDeclarationData),
        get_import_equals => ImportEquals(ImportEqualsData),
        get_export_decl => ExportDecl(ExportDeclData),
        get_specifier => Specifier(SpecifierData),
        get_export_assignment => ExportAssignment(ExportAssignmentData),
        get_parameter => Parameter(ParameterData),
        get_type_parameter => TypeParameter(TypeParameterData),
        get_property => Property(PropertyData),
        get_index_signature => IndexSignature(IndexSignatureData),
        get_heritage => Heritage(HeritageData),
        get_expr_with_type_args => ExprWithTypeArgs(ExprWithTypeArgsData),
        get_decorator => Decorator(DecoratorData),
        get_binding_pattern => BindingPattern(BindingPatternData),
        get_binding_element => BindingElement(BindingElementData),
        get_type_ref => TypeRef(TypeRefData),
        get_array_type => ArrayType(ArrayTypeData),
        get_composite_type => CompositeType(CompositeTypeData),
        get_type_literal => TypeLiteral(TypeLiteralData),
        get_type_query => TypeQuery(TypeQueryData),
        get_wrapped => Wrapped(WrappedData),
        get_object_literal => ObjectLiteral(ObjectLiteralData),
        get_property_assignment => PropertyAssignment(PropertyAssignmentData),
        get_array_literal => ArrayLiteral(ArrayLiteralData),
        get_call => Call(CallExprData),
        get_access => Access(AccessExprData),
        get_opaque => Opaque(OpaqueData),
    }

    /// Visit the immediate children of `idx` in source order.
    pub fn for_each_child(&self, idx: NodeIndex, mut visit: impl FnMut(NodeIndex)) {
        if let Some(node) = self.get(idx) {
            for child in children_of(&node.data) {
                visit(child);
            }
        }
    }

    // ============================================================================
    // Name helpers
    // ============================================================================

    /// Text of an identifier or string/numeric literal.
    pub fn identifier_text(&self, idx: NodeIndex) -> Option<&str> {
        let node = self.get(idx)?;
        match &node.data {
            NodeData::Identifier(data) => Some(&data.escaped_text),
            NodeData::Literal(data) => Some(&data.text),
            _ => None,
        }
    }

    /// The `name` child of a named declaration or member.
    pub fn declaration_name(&self, idx: NodeIndex) -> NodeIndex {
        let Some(node) = self.get(idx) else {
            return NodeIndex::NONE;
        };
        match &node.data {
            NodeData::Module(data) => data.name,
            NodeData::Class(data) => data.name,
            NodeData::Interface(data) => data.name,
            NodeData::Enum(data) => data.name,
            NodeData::EnumMember(data) => data.name,
            NodeData::TypeAlias(data) => data.name,
            NodeData::Function(data) => data.name,
            NodeData::VariableDeclaration(data) => data.name,
            NodeData::ImportEquals(data) => data.name,
            NodeData::Specifier(data) => data.name,
            NodeData::Parameter(data) => data.name,
            NodeData::TypeParameter(data) => data.name,
            NodeData::Property(data) => data.name,
            NodeData::BindingElement(data) => data.name,
            NodeData::PropertyAssignment(data) => data.name,
            _ => NodeIndex::NONE,
        }
    }

    /// Declared name text, resolving computed names of the form `[X.y]`
    /// to `y`.
    pub fn declaration_name_text(&self, idx: NodeIndex) -> Option<String> {
        self.property_name_text(self.declaration_name(idx))
    }

    /// Text of a property name node (identifier, literal, or computed).
    pub fn property_name_text(&self, name: NodeIndex) -> Option<String> {
        let node = self.get(name)?;
        match &node.data {
            NodeData::Identifier(_) | NodeData::Literal(_) => {
                self.identifier_text(name).map(str::to_string)
            }
            NodeData::ComputedProperty(data) => match &self.get(data.expression)?.data {
                NodeData::Access(access) => self.identifier_text(access.name).map(str::to_string),
                NodeData::Identifier(id) => Some(id.escaped_text.clone()),
                NodeData::Literal(lit) => Some(lit.text.clone()),
                _ => None,
            },
            _ => None,
        }
    }

    /// Dotted text of an identifier / qualified name / property access chain.
    pub fn entity_name_text(&self, idx: NodeIndex) -> Option<String> {
        let node = self.get(idx)?;
        match &node.data {
            NodeData::Identifier(data) => Some(data.escaped_text.clone()),
            NodeData::QualifiedName(data) => Some(format!(
                "{}.{}",
                self.entity_name_text(data.left)?,
                self.entity_name_text(data.right)?
            )),
            NodeData::Access(data) => Some(format!(
                "{}.{}",
                self.entity_name_text(data.expression)?,
                self.entity_name_text(data.name)?
            )),
            _ => None,
        }
    }

    /// The `SourceFile` node that contains `idx`.
    pub fn source_file_of(&self, idx: NodeIndex) -> NodeIndex {
        let mut current = idx;
        let mut hops = 0u32;
        while let Some(node) = self.get(current) {
            if node.kind == SyntaxKind::SourceFile {
                return current;
            }
            hops += 1;
            if hops > MAX_ANCESTOR_WALK {
                break;
            }
            current = node.parent;
        }
        NodeIndex::NONE
    }

    /// Short human-readable rendering used in diagnostics.
    pub fn node_text(&self, idx: NodeIndex) -> String {
        let Some(node) = self.get(idx) else {
            return "<missing>".to_string();
        };
        if let Some(text) = self.entity_name_text(idx) {
            return text;
        }
        match &node.data {
            NodeData::Literal(data) => format!("{:?}", data.text),
            NodeData::Opaque(data) => data.text.clone(),
            NodeData::SourceFile(data) => data.file_name.clone(),
            _ => match self.declaration_name_text(idx) {
                Some(name) => format!("{:?} {}", node.kind, name),
                None => format!("{:?}", node.kind),
            },
        }
    }
}

fn push_opt(out: &mut Vec<NodeIndex>, idx: NodeIndex) {
    if idx.is_some() {
        out.push(idx);
    }
}

/// Children of a payload, in source order.
fn children_of(data: &NodeData) -> Vec<NodeIndex> {
    let mut out = Vec::new();
    match data {
        NodeData::Token | NodeData::Identifier(_) | NodeData::Literal(_) => {}
        NodeData::SourceFile(d) => out.extend(&d.statements),
        NodeData::QualifiedName(d) => {
            push_opt(&mut out, d.left);
            push_opt(&mut out, d.right);
        }
        NodeData::ComputedProperty(d) => push_opt(&mut out, d.expression),
        NodeData::Module(d) => {
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.body);
        }
        NodeData::ModuleBlock(d) => out.extend(&d.statements),
        NodeData::Class(d) => {
            out.extend(&d.decorators);
            push_opt(&mut out, d.name);
            out.extend(&d.type_parameters);
            out.extend(&d.heritage_clauses);
            out.extend(&d.members);
        }
        NodeData::Interface(d) => {
            push_opt(&mut out, d.name);
            out.extend(&d.type_parameters);
            out.extend(&d.heritage_clauses);
            out.extend(&d.members);
        }
        NodeData::Enum(d) => {
            push_opt(&mut out, d.name);
            out.extend(&d.members);
        }
        NodeData::EnumMember(d) => {
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.initializer);
        }
        NodeData::TypeAlias(d) => {
            push_opt(&mut out, d.name);
            out.extend(&d.type_parameters);
            push_opt(&mut out, d.type_node);
        }
        NodeData::Function(d) => {
            out.extend(&d.decorators);
            push_opt(&mut out, d.name);
            out.extend(&d.type_parameters);
            out.extend(&d.parameters);
            push_opt(&mut out, d.type_annotation);
        }
        NodeData::VariableStatement(d) => out.extend(&d.declarations),
        NodeData::VariableDeclaration(d) => {
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.type_annotation);
            push_opt(&mut out, d.initializer);
        }
        NodeData::ImportEquals(d) => {
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.module_reference);
        }
        NodeData::ExportDecl(d) => {
            if let Some(clause) = &d.export_clause {
                out.extend(clause);
            }
            push_opt(&mut out, d.module_specifier);
        }
        NodeData::Specifier(d) => {
            push_opt(&mut out, d.property_name);
            push_opt(&mut out, d.name);
        }
        NodeData::ExportAssignment(d) => push_opt(&mut out, d.expression),
        NodeData::Parameter(d) => {
            out.extend(&d.decorators);
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.type_annotation);
            push_opt(&mut out, d.initializer);
        }
        NodeData::TypeParameter(d) => {
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.constraint);
            push_opt(&mut out, d.default);
        }
        NodeData::Property(d) => {
            out.extend(&d.decorators);
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.type_annotation);
            push_opt(&mut out, d.initializer);
        }
        NodeData::IndexSignature(d) => {
            out.extend(&d.parameters);
            push_opt(&mut out, d.type_annotation);
        }
        NodeData::Heritage(d) => out.extend(&d.types),
        NodeData::ExprWithTypeArgs(d) => {
            push_opt(&mut out, d.expression);
            if let Some(args) = &d.type_arguments {
                out.extend(args);
            }
        }
        NodeData::Decorator(d) => push_opt(&mut out, d.expression),
        NodeData::BindingPattern(d) => out.extend(&d.elements),
        NodeData::BindingElement(d) => {
            push_opt(&mut out, d.property_name);
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.initializer);
        }
        NodeData::TypeRef(d) => {
            push_opt(&mut out, d.type_name);
            if let Some(args) = &d.type_arguments {
                out.extend(args);
            }
        }
        NodeData::ArrayType(d) => push_opt(&mut out, d.element_type),
        NodeData::CompositeType(d) => out.extend(&d.types),
        NodeData::TypeLiteral(d) => out.extend(&d.members),
        NodeData::TypeQuery(d) => push_opt(&mut out, d.expr_name),
        NodeData::Wrapped(d) => push_opt(&mut out, d.inner),
        NodeData::ObjectLiteral(d) => out.extend(&d.properties),
        NodeData::PropertyAssignment(d) => {
            push_opt(&mut out, d.name);
            push_opt(&mut out, d.initializer);
        }
        NodeData::ArrayLiteral(d) => out.extend(&d.elements),
        NodeData::Call(d) => {
            push_opt(&mut out, d.expression);
            out.extend(&d.arguments);
        }
        NodeData::Access(d) => {
            push_opt(&mut out, d.expression);
            push_opt(&mut out, d.name);
        }
        NodeData::Opaque(d) => out.extend(&d.children),
    }
    out
}

#[cfg(test)]
#[path = "../tests/node_arena_tests.rs"]
mod tests;
