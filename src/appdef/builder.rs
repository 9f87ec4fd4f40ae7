//! Fluent construction of an [`AppDef`].
//!
//! Builder calls never fail. Every consistency check runs in [`AppDefBuilder::build`],
//! which reports the first problem found.

use std::collections::{BTreeMap, BTreeSet};

use super::{AppDef, Workspace, WorkspaceRef};
use crate::error::{AclError, Result};
use crate::types::{
    AclFilter, AclRule, DataKind, Field, FieldName, Filter, OperationKind, OperationsSet,
    PolicyKind, QName, TypeDef, TypeKind,
};

/// Collects workspaces, types and rules until [`build`](Self::build).
#[derive(Debug, Default)]
pub struct AppDefBuilder {
    workspaces: Vec<WorkspaceBuilder>,
}

/// A rule as declared, before its filter and principal are resolved.
#[derive(Debug)]
struct PendingRule {
    /// `None` for "all operations applicable to the first matched type".
    ops: Option<OperationsSet>,
    policy: PolicyKind,
    filter: Filter,
    fields: Vec<FieldName>,
    principal: QName,
    comment: Option<String>,
}

/// Declarations of one workspace.
#[derive(Debug)]
pub struct WorkspaceBuilder {
    qname: QName,
    ancestors: Vec<QName>,
    types: Vec<TypeDef>,
    rules: Vec<PendingRule>,
    comment: Option<String>,
}

/// Adds fields and tags to a document, record or object.
#[derive(Debug)]
pub struct StructureBuilder<'a> {
    def: &'a mut TypeDef,
}

/// Adds key and value fields to a view.
#[derive(Debug)]
pub struct ViewBuilder<'a> {
    def: &'a mut TypeDef,
}

/// Sets the signature of a command or query.
#[derive(Debug)]
pub struct FunctionBuilder<'a> {
    def: &'a mut TypeDef,
}

impl AppDefBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a workspace and returns its builder.
    pub fn add_workspace(&mut self, name: QName) -> &mut WorkspaceBuilder {
        let idx = self.workspaces.len();
        self.workspaces.push(WorkspaceBuilder::new(name));
        &mut self.workspaces[idx]
    }

    /// Builder of a previously added workspace.
    pub fn workspace_mut(&mut self, name: &QName) -> Option<&mut WorkspaceBuilder> {
        self.workspaces.iter_mut().find(|ws| &ws.qname == name)
    }

    /// Validates the declarations and produces the immutable application.
    pub fn build(self) -> Result<AppDef> {
        let mut app = AppDef::default();
        let mut pending = Vec::with_capacity(self.workspaces.len());

        for wsb in self.workspaces {
            let WorkspaceBuilder {
                qname,
                ancestors,
                types,
                rules,
                comment,
            } = wsb;

            if app.workspaces.contains_key(&qname) {
                return Err(AclError::invalid(format!(
                    "workspace «{qname}» is declared twice"
                )));
            }

            let mut local_types = Vec::with_capacity(types.len());
            for t in types {
                check_unique_fields(&t)?;
                if app.types.contains_key(t.qname()) {
                    return Err(AclError::invalid(format!(
                        "type «{}» is declared twice",
                        t.qname()
                    )));
                }
                local_types.push(t.qname().clone());
                app.types.insert(t.qname().clone(), t);
            }

            app.workspaces.insert(
                qname.clone(),
                Workspace {
                    qname: qname.clone(),
                    ancestors,
                    lineage: BTreeSet::new(),
                    local_types,
                    acl: Vec::new(),
                    comment,
                },
            );
            pending.push((qname, rules));
        }

        resolve_lineages(&mut app)?;
        check_tags(&app)?;

        let mut rule_count = 0usize;
        for (name, rules) in pending {
            let mut acl = Vec::with_capacity(rules.len());
            if let Some(ws) = app.workspace(&name) {
                for rule in rules {
                    acl.push(resolve_rule(ws, rule)?);
                }
            }
            rule_count += acl.len();
            if let Some(ws) = app.workspaces.get_mut(&name) {
                ws.acl = acl;
            }
        }

        tracing::debug!(
            target: "wsacl::appdef",
            workspaces = app.workspaces.len(),
            types = app.types.len(),
            rules = rule_count,
            "application built"
        );
        Ok(app)
    }
}

impl WorkspaceBuilder {
    fn new(qname: QName) -> Self {
        Self {
            qname,
            ancestors: Vec::new(),
            types: Vec::new(),
            rules: Vec::new(),
            comment: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &QName {
        &self.qname
    }

    /// Replaces the ancestor list. Order matters: earlier ancestors are walked first.
    pub fn set_ancestors(&mut self, ancestors: impl IntoIterator<Item = QName>) -> &mut Self {
        self.ancestors = ancestors.into_iter().collect();
        self
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    fn add_type(&mut self, name: QName, kind: TypeKind) -> &mut TypeDef {
        let idx = self.types.len();
        self.types
            .push(TypeDef::new(name, kind, self.qname.clone()));
        &mut self.types[idx]
    }

    fn add_structure(&mut self, name: QName, kind: TypeKind) -> StructureBuilder<'_> {
        StructureBuilder {
            def: self.add_type(name, kind),
        }
    }

    pub fn add_gdoc(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::GDoc)
    }

    pub fn add_cdoc(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::CDoc)
    }

    pub fn add_wdoc(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::WDoc)
    }

    pub fn add_odoc(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::ODoc)
    }

    pub fn add_grecord(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::GRecord)
    }

    pub fn add_crecord(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::CRecord)
    }

    pub fn add_wrecord(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::WRecord)
    }

    pub fn add_orecord(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::ORecord)
    }

    pub fn add_object(&mut self, name: QName) -> StructureBuilder<'_> {
        self.add_structure(name, TypeKind::Object)
    }

    pub fn add_view(&mut self, name: QName) -> ViewBuilder<'_> {
        ViewBuilder {
            def: self.add_type(name, TypeKind::ViewRecord),
        }
    }

    pub fn add_command(&mut self, name: QName) -> FunctionBuilder<'_> {
        FunctionBuilder {
            def: self.add_type(name, TypeKind::Command),
        }
    }

    pub fn add_query(&mut self, name: QName) -> FunctionBuilder<'_> {
        FunctionBuilder {
            def: self.add_type(name, TypeKind::Query),
        }
    }

    pub fn add_role(&mut self, name: QName) -> &mut Self {
        self.add_type(name, TypeKind::Role);
        self
    }

    pub fn add_tag(&mut self, name: QName) -> &mut Self {
        self.add_type(name, TypeKind::Tag);
        self
    }

    fn push_rule(
        &mut self,
        ops: Option<OperationsSet>,
        policy: PolicyKind,
        filter: Filter,
        fields: &[&str],
        principal: QName,
        comment: &str,
    ) -> &mut Self {
        self.rules.push(PendingRule {
            ops,
            policy,
            filter,
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            principal,
            comment: (!comment.is_empty()).then(|| comment.to_string()),
        });
        self
    }

    /// `GRANT ops ON filter[fields] TO principal`. Empty `fields` means every field.
    pub fn grant(
        &mut self,
        ops: impl IntoIterator<Item = OperationKind>,
        filter: Filter,
        fields: &[&str],
        principal: QName,
        comment: &str,
    ) -> &mut Self {
        let ops = ops.into_iter().collect();
        self.push_rule(Some(ops), PolicyKind::Allow, filter, fields, principal, comment)
    }

    /// `REVOKE ops ON filter[fields] FROM principal`. Empty `fields` means every field.
    pub fn revoke(
        &mut self,
        ops: impl IntoIterator<Item = OperationKind>,
        filter: Filter,
        fields: &[&str],
        principal: QName,
        comment: &str,
    ) -> &mut Self {
        let ops = ops.into_iter().collect();
        self.push_rule(Some(ops), PolicyKind::Deny, filter, fields, principal, comment)
    }

    /// Grants every operation applicable to the kind of the first matched type.
    pub fn grant_all(&mut self, filter: Filter, principal: QName, comment: &str) -> &mut Self {
        self.push_rule(None, PolicyKind::Allow, filter, &[], principal, comment)
    }

    /// Revokes every operation applicable to the kind of the first matched type.
    pub fn revoke_all(&mut self, filter: Filter, principal: QName, comment: &str) -> &mut Self {
        self.push_rule(None, PolicyKind::Deny, filter, &[], principal, comment)
    }
}

impl StructureBuilder<'_> {
    pub fn add_field(
        &mut self,
        name: impl Into<FieldName>,
        data: DataKind,
        required: bool,
    ) -> &mut Self {
        if let Some(fields) = self.def.fields_mut() {
            fields.push(Field::new(name, data, required));
        }
        self
    }

    pub fn set_tag(&mut self, tag: QName) -> &mut Self {
        self.def.tags.push(tag);
        self
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.def.comment = Some(comment.into());
        self
    }
}

impl ViewBuilder<'_> {
    pub fn add_part_key_field(&mut self, name: impl Into<FieldName>, data: DataKind) -> &mut Self {
        if let Some(view) = self.def.view_mut() {
            view.insert_part_key(Field::new(name, data, true));
        }
        self
    }

    pub fn add_clust_col_field(
        &mut self,
        name: impl Into<FieldName>,
        data: DataKind,
    ) -> &mut Self {
        if let Some(view) = self.def.view_mut() {
            view.insert_clust_col(Field::new(name, data, true));
        }
        self
    }

    pub fn add_value_field(
        &mut self,
        name: impl Into<FieldName>,
        data: DataKind,
        required: bool,
    ) -> &mut Self {
        if let Some(view) = self.def.view_mut() {
            view.fields.push(Field::new(name, data, required));
        }
        self
    }

    pub fn set_tag(&mut self, tag: QName) -> &mut Self {
        self.def.tags.push(tag);
        self
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.def.comment = Some(comment.into());
        self
    }
}

impl FunctionBuilder<'_> {
    pub fn set_param(&mut self, param: QName) -> &mut Self {
        if let Some(sig) = self.def.function_mut() {
            sig.param = Some(param);
        }
        self
    }

    pub fn set_result(&mut self, result: QName) -> &mut Self {
        if let Some(sig) = self.def.function_mut() {
            sig.result = Some(result);
        }
        self
    }

    pub fn set_tag(&mut self, tag: QName) -> &mut Self {
        self.def.tags.push(tag);
        self
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.def.comment = Some(comment.into());
        self
    }
}

fn check_unique_fields(t: &TypeDef) -> Result<()> {
    let mut seen = BTreeSet::new();
    for name in t.field_names() {
        if !seen.insert(name) {
            return Err(AclError::invalid(format!(
                "field «{name}» is declared twice in {t}"
            )));
        }
    }
    Ok(())
}

/// Fills `lineage` of every workspace, rejecting unknown ancestors and cycles.
fn resolve_lineages(app: &mut AppDef) -> Result<()> {
    let mut lineages = BTreeMap::new();
    for name in app.workspaces.keys() {
        let mut path = Vec::new();
        let mut lineage = BTreeSet::new();
        collect_lineage(app, name, &mut path, &mut lineage)?;
        lineages.insert(name.clone(), lineage);
    }
    for (name, lineage) in lineages {
        if let Some(ws) = app.workspaces.get_mut(&name) {
            ws.lineage = lineage;
        }
    }
    Ok(())
}

fn collect_lineage(
    app: &AppDef,
    name: &QName,
    path: &mut Vec<QName>,
    lineage: &mut BTreeSet<QName>,
) -> Result<()> {
    if let Some(pos) = path.iter().position(|n| n == name) {
        let cycle: Vec<String> = path[pos..]
            .iter()
            .chain(std::iter::once(name))
            .map(ToString::to_string)
            .collect();
        return Err(AclError::invalid(format!(
            "workspace ancestors cycle: {}",
            cycle.join(" -> ")
        )));
    }
    if !lineage.insert(name.clone()) {
        return Ok(());
    }
    let Some(ws) = app.workspaces.get(name) else {
        return Ok(());
    };

    path.push(name.clone());
    for ancestor in &ws.ancestors {
        if !app.workspaces.contains_key(ancestor) {
            return Err(AclError::not_found(format!(
                "ancestor workspace «{ancestor}» of «{name}»"
            )));
        }
        collect_lineage(app, ancestor, path, lineage)?;
    }
    path.pop();
    Ok(())
}

fn check_tags(app: &AppDef) -> Result<()> {
    for t in app.types.values() {
        for tag in t.tags() {
            let known = app
                .types
                .get(tag)
                .is_some_and(|def| def.kind() == TypeKind::Tag);
            if !known {
                return Err(AclError::not_found(format!("tag «{tag}» of {t}")));
            }
        }
    }
    Ok(())
}

fn resolve_rule(ws: WorkspaceRef<'_>, rule: PendingRule) -> Result<AclRule> {
    let PendingRule {
        ops,
        policy,
        filter,
        fields,
        principal,
        comment,
    } = rule;

    let matched: Vec<&TypeDef> = ws.types().filter(|t| filter.matches(t)).collect();
    let no_matches = || AclError::not_found(format!("filter {filter} has no matches in {ws}"));

    let ops = match ops {
        Some(ops) => ops,
        None => {
            let first = matched.first().ok_or_else(no_matches)?;
            first.kind().acl_operations().iter().copied().collect()
        }
    };

    if ops.is_empty() {
        return Err(AclError::missed(format!(
            "operations of {} ON {filter} in {ws}",
            policy.action()
        )));
    }
    if !ops.is_compatible() {
        return Err(AclError::incompatible(format!(
            "operations {ops} can not be mixed in one rule"
        )));
    }
    if policy == PolicyKind::Deny && ops.contains(OperationKind::Inherits) {
        return Err(AclError::unsupported(format!(
            "REVOKE of {} ON {filter}",
            OperationKind::Inherits
        )));
    }
    let fieldless = ops.contains(OperationKind::Inherits) || ops.contains(OperationKind::Execute);
    if fieldless && !fields.is_empty() {
        return Err(AclError::incompatible(format!(
            "fields are not applicable to {ops}"
        )));
    }

    if !ws.type_def(&principal).is_some_and(TypeDef::is_role) {
        return Err(AclError::not_found(format!("role «{principal}» in {ws}")));
    }

    if matched.is_empty() {
        return Err(no_matches());
    }
    for t in &matched {
        let supported = t.kind().acl_operations();
        if let Some(op) = ops.iter().find(|op| !supported.contains(op)) {
            return Err(AclError::incompatible(format!("{t} does not support {op}")));
        }
        let declared = t.with_fields();
        if let Some(f) = fields
            .iter()
            .find(|f| declared.and_then(|w| w.field(f)).is_none())
        {
            return Err(AclError::not_found(format!("field «{f}» in {t}")));
        }
    }

    Ok(AclRule {
        ops,
        policy,
        filter: AclFilter::new(filter, fields),
        principal,
        workspace: ws.name().clone(),
        comment,
    })
}
