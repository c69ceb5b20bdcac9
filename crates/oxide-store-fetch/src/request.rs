//! Compiled fetch of selected members of one object.
//!
//! A [`FetchRequest`] is compiled once per class and member selection and
//! then executed against any number of objects of that class. Compiled
//! requests hold only SQL text and layout; everything specific to one
//! object lives in the execution call.

use std::collections::{BTreeMap, BTreeSet};

use oxide_store_core::dialect::DialectProfile;
use oxide_store_core::expr::{ClauseKind, CompileContext, SqlExpression};
use oxide_store_core::statement::{
    JoinType, MappingKey, SelectStatement, SqlTable, SqlText, StatementClassMapping,
    StatementMappingIndex,
};
use oxide_store_core::SqlValue;
use tracing::{debug, info, warn};

use crate::datastore::{ConnectionProvider, LockManager, LockMode};
use crate::error::{DatastoreError, FetchError, Result};
use crate::metadata::{
    ClassMapping, IdentityColumn, MemberKind, MemberMapping, MetadataCatalog, VersionMapping,
};
use crate::state::{FieldValue, IdentityValue, LoadedObject, ObjectReference, ObjectState};

/// Per-call collaborators of [`FetchRequest::execute`].
pub struct FetchContext<'a> {
    /// Profile the request was compiled with.
    pub profile: &'a DialectProfile,
    pub connections: &'a dyn ConnectionProvider,
    /// Consulted on every call.
    pub locks: &'a dyn LockManager,
    /// Tenant bound when the tenancy filter is not fixed at compile time.
    pub tenant: Option<String>,
}

/// What an execution did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The row was read into the object.
    Loaded,
    /// Only the version was requested and the object already had one.
    VersionCached,
    /// Nothing is read from the row; only deferred members were loaded.
    NoStatement,
}

#[derive(Debug, Clone)]
enum FieldPlan {
    Scalar {
        member: usize,
    },
    /// Foreign key only.
    Reference {
        member: usize,
        target: String,
        surrogate: bool,
    },
    /// Joined related row.
    Object {
        member: usize,
        target: String,
        surrogate: bool,
        identity: Vec<MappingKey>,
    },
}

#[derive(Debug, Clone)]
struct StorePlan {
    member: usize,
    target: String,
    surrogate: bool,
}

/// SQL text of a fetch in both lock variants, with its layout.
#[derive(Debug, Clone)]
pub struct CompiledFetch {
    unlocked: SqlText,
    locked: SqlText,
    mapping: StatementClassMapping,
    result_types: Vec<String>,
}

impl CompiledFetch {
    /// Text for the given lock mode.
    #[must_use]
    pub const fn text(&self, lock: LockMode) -> &SqlText {
        match lock {
            LockMode::None => &self.unlocked,
            LockMode::Pessimistic => &self.locked,
        }
    }

    /// Result-column and parameter layout.
    #[must_use]
    pub const fn mapping(&self) -> &StatementClassMapping {
        &self.mapping
    }

    /// Logical type of each result column, in projection order.
    #[must_use]
    pub fn result_types(&self) -> &[String] {
        &self.result_types
    }
}

/// A compiled single-object fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    class_name: String,
    table: String,
    statement: Option<CompiledFetch>,
    fields: Vec<FieldPlan>,
    store: Vec<StorePlan>,
    deferred: Vec<usize>,
    has_version: bool,
    version_member: Option<usize>,
    identity_layout: Vec<(MappingKey, usize)>,
}

impl FetchRequest {
    /// Compiles a fetch of `fetch_members` of `class_name`, also reading
    /// the foreign keys of the relations in `store_members`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Metadata`] for unknown classes or members and
    /// inconsistent relation metadata, [`FetchError::Core`] when the
    /// statement cannot be built for the profile.
    pub fn compile(
        catalog: &MetadataCatalog,
        profile: &DialectProfile,
        class_name: &str,
        fetch_members: &[usize],
        store_members: &[usize],
    ) -> Result<Self> {
        let fetch: BTreeSet<usize> = fetch_members.iter().copied().collect();
        let store: BTreeSet<usize> = store_members
            .iter()
            .copied()
            .filter(|n| !fetch.contains(n))
            .collect();

        let chain = catalog.chain(class_name)?;
        let mut requested = Vec::new();
        for &number in &fetch {
            let (depth, member) = catalog.member(class_name, number)?;
            requested.push((depth, member, false));
        }
        for &number in &store {
            let (depth, member) = catalog.member(class_name, number)?;
            requested.push((depth, member, true));
        }
        let primary = primary_depth(&chain, &requested);

        let identity = catalog.identity_columns(class_name)?;
        let mut compiler = Compiler {
            catalog,
            profile,
            chain: &chain,
            primary,
            identity: &identity,
            select: SelectStatement::new(chain[primary].table.name.as_str()),
            aliases: BTreeMap::new(),
            mapping: StatementClassMapping::new(class_name),
            result_types: Vec::new(),
        };

        let mut request = Self {
            class_name: class_name.to_string(),
            table: chain[primary].table.name.clone(),
            statement: None,
            fields: Vec::new(),
            store: Vec::new(),
            deferred: Vec::new(),
            has_version: false,
            version_member: None,
            identity_layout: identity
                .iter()
                .map(|column| (identity_key(column), column.position))
                .collect(),
        };

        let version = compiler.select_version()?;
        request.has_version = version.is_some();
        request.version_member = version.and_then(|version| version.member);
        for (depth, member, store_only) in requested {
            request.plan_member(&mut compiler, depth, member, store_only)?;
        }

        if compiler.select.projection_len() > 0 {
            compiler.restrict()?;
            request.statement = Some(compiler.finish());
        }

        info!(
            class = %class_name,
            table = %request.table,
            fetch = ?fetch,
            store = ?store,
            compiled = request.statement.is_some(),
            "compiled fetch request"
        );
        Ok(request)
    }

    /// Projects one requested member and records how to apply it.
    fn plan_member(
        &mut self,
        compiler: &mut Compiler<'_>,
        depth: usize,
        member: &MemberMapping,
        store_only: bool,
    ) -> Result<()> {
        match (&member.kind, store_only) {
            (MemberKind::Map(_), false) => self.deferred.push(member.number),
            (MemberKind::Relation { target }, true) => {
                let surrogate = compiler.select_foreign_key(depth, member)?;
                self.store.push(StorePlan {
                    member: member.number,
                    target: target.clone(),
                    surrogate,
                });
            }
            (_, true) => {
                warn!(
                    class = %self.class_name,
                    member = %member.name,
                    "store-only member is not a relation; ignored"
                );
            }
            (MemberKind::Scalar, false) => {
                compiler.select_scalar(depth, member)?;
                self.fields.push(FieldPlan::Scalar {
                    member: member.number,
                });
            }
            (MemberKind::Relation { target }, false) => {
                let plan = if compiler.join_depth(member, target)? == 0 {
                    let surrogate = compiler.select_foreign_key(depth, member)?;
                    FieldPlan::Reference {
                        member: member.number,
                        target: target.clone(),
                        surrogate,
                    }
                } else {
                    let (surrogate, identity) = compiler.select_related(depth, member, target)?;
                    FieldPlan::Object {
                        member: member.number,
                        target: target.clone(),
                        surrogate,
                        identity,
                    }
                };
                self.fields.push(plan);
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Table the statement selects from.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Compiled statement; `None` when nothing is read from a row.
    #[must_use]
    pub const fn statement(&self) -> Option<&CompiledFetch> {
        self.statement.as_ref()
    }

    /// SQL for the given lock mode.
    #[must_use]
    pub fn sql(&self, lock: LockMode) -> Option<&str> {
        self.statement
            .as_ref()
            .map(|compiled| compiled.text(lock).sql.as_str())
    }

    /// Whether the request reads nothing but the version.
    #[must_use]
    pub fn is_version_only(&self) -> bool {
        self.has_version
            && self.fields.is_empty()
            && self.store.is_empty()
            && self.deferred.is_empty()
    }

    /// Reads the requested members of `state` from the datastore.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] when no row matches the identity,
    /// [`FetchError::Cancelled`] or [`FetchError::Datastore`] for datastore
    /// failures, and whatever [`ObjectState::load_deferred`] reports.
    pub async fn execute(
        &self,
        ctx: &FetchContext<'_>,
        state: &mut dyn ObjectState,
    ) -> Result<FetchOutcome> {
        let Some(compiled) = &self.statement else {
            self.load_deferred(state)?;
            return Ok(FetchOutcome::NoStatement);
        };
        if self.is_version_only() && state.cached_version().is_some() {
            debug!(class = %self.class_name, "version already cached");
            return Ok(FetchOutcome::VersionCached);
        }

        let identity = state.identity_values();
        let text = compiled.text(ctx.locks.lock_mode(&identity));
        let params = self.bind(text, &identity, ctx.tenant.as_deref())?;

        let mut connection = ctx
            .connections
            .acquire()
            .await
            .map_err(|err| self.datastore_error(ctx.profile, err))?;
        debug!(class = %self.class_name, sql = %text.sql, "executing fetch");
        let result = connection
            .query_first(&text.sql, &params, &compiled.result_types)
            .await;
        ctx.connections.release(connection).await;

        let row = result
            .map_err(|err| self.datastore_error(ctx.profile, err))?
            .ok_or_else(|| FetchError::NotFound {
                class: self.class_name.clone(),
                identity: IdentityValue::Compound(identity).to_string(),
            })?;

        let mapping = &compiled.mapping;
        if let Some(version) = mapping.index.mapping(MappingKey::Version) {
            let value = read_first(&row, &version.column_positions)?;
            state.set_version(value.clone());
            if let Some(member) = self.version_member {
                state.replace_field(member, scalar_field(value));
            }
        }
        for plan in &self.fields {
            self.apply_field(mapping, &row, plan, state)?;
        }
        for plan in &self.store {
            let values = read_all(
                &row,
                positions(&mapping.index, MappingKey::Member(plan.member)),
            )?;
            let reference =
                IdentityValue::from_columns(values, plan.surrogate).map(|identity| ObjectReference {
                    class: plan.target.clone(),
                    identity,
                });
            state.store_reference(plan.member, reference);
        }
        self.load_deferred(state)?;
        Ok(FetchOutcome::Loaded)
    }

    fn apply_field(
        &self,
        mapping: &StatementClassMapping,
        row: &[SqlValue],
        plan: &FieldPlan,
        state: &mut dyn ObjectState,
    ) -> Result<()> {
        match plan {
            FieldPlan::Scalar { member } => {
                let value =
                    read_first(row, positions(&mapping.index, MappingKey::Member(*member)))?;
                state.replace_field(*member, scalar_field(value));
            }
            FieldPlan::Reference {
                member,
                target,
                surrogate,
            } => {
                let values = read_all(row, positions(&mapping.index, MappingKey::Member(*member)))?;
                let value = IdentityValue::from_columns(values, *surrogate).map_or(
                    FieldValue::Null,
                    |identity| {
                        FieldValue::Reference(ObjectReference {
                            class: target.clone(),
                            identity,
                        })
                    },
                );
                state.replace_field(*member, value);
            }
            FieldPlan::Object {
                member,
                target,
                surrogate,
                identity,
            } => {
                let child = mapping.child(*member).ok_or_else(|| {
                    FetchError::Metadata(format!(
                        "no related layout for member {member} of '{}'",
                        self.class_name
                    ))
                })?;
                let mut values = Vec::new();
                for key in identity {
                    values.extend(read_all(row, positions(&child.index, *key))?);
                }
                let value = IdentityValue::from_columns(values, *surrogate)
                    .map(|id| read_related(row, child, target, id, identity))
                    .transpose()?
                    .map_or(FieldValue::Null, FieldValue::Object);
                state.replace_field(*member, value);
            }
        }
        Ok(())
    }

    fn load_deferred(&self, state: &mut dyn ObjectState) -> Result<()> {
        for member in &self.deferred {
            state.load_deferred(*member)?;
        }
        Ok(())
    }

    fn bind(
        &self,
        text: &SqlText,
        identity: &[SqlValue],
        tenant: Option<&str>,
    ) -> Result<Vec<SqlValue>> {
        text.params
            .iter()
            .map(|param| {
                if let Some(value) = &param.value {
                    return Ok(value.clone());
                }
                if param.key == MappingKey::Tenant {
                    return tenant
                        .map(|tenant| SqlValue::Text(tenant.to_string()))
                        .ok_or_else(|| {
                            FetchError::Metadata(format!(
                                "fetching '{}' requires a tenant",
                                self.class_name
                            ))
                        });
                }
                let slot = self
                    .identity_layout
                    .iter()
                    .position(|(key, column)| *key == param.key && *column == param.column)
                    .ok_or_else(|| {
                        FetchError::Metadata(format!(
                            "parameter {:?} of '{}' is not an identity column",
                            param.key, self.class_name
                        ))
                    })?;
                identity.get(slot).cloned().ok_or_else(|| {
                    FetchError::Metadata(format!(
                        "'{}' needs {} identity values, got {}",
                        self.class_name,
                        self.identity_layout.len(),
                        identity.len()
                    ))
                })
            })
            .collect()
    }

    fn datastore_error(&self, profile: &DialectProfile, err: DatastoreError) -> FetchError {
        let cancelled = err.any(|link| {
            profile.is_statement_cancel(link.code.as_deref(), link.sql_state.as_deref())
        });
        if cancelled {
            warn!(class = %self.class_name, error = %err, "fetch statement cancelled");
            FetchError::Cancelled(err)
        } else {
            FetchError::Datastore(err)
        }
    }
}

/// Least-derived table owning a projected member, else the first table in
/// the chain with a version column.
fn primary_depth(chain: &[&ClassMapping], requested: &[(usize, &MemberMapping, bool)]) -> usize {
    requested
        .iter()
        .filter(|(_, member, store_only)| match member.kind {
            MemberKind::Scalar => !store_only,
            MemberKind::Relation { .. } => true,
            MemberKind::Map(_) => false,
        })
        .map(|(depth, _, _)| *depth)
        .max()
        .unwrap_or_else(|| {
            chain
                .iter()
                .position(|class| class.table.version.is_some())
                .unwrap_or(0)
        })
}

/// A related object from the columns of its child layout.
fn read_related(
    row: &[SqlValue],
    child: &StatementClassMapping,
    target: &str,
    identity: IdentityValue,
    identity_keys: &[MappingKey],
) -> Result<LoadedObject> {
    let discriminator = child
        .index
        .mapping(MappingKey::Discriminator)
        .map(|m| read_first(row, &m.column_positions))
        .transpose()?;
    let mut fields = Vec::new();
    for number in child.index.result_members() {
        if identity_keys.contains(&MappingKey::Member(number)) {
            continue;
        }
        let value = read_first(row, positions(&child.index, MappingKey::Member(number)))?;
        fields.push((number, value));
    }
    Ok(LoadedObject {
        reference: ObjectReference {
            class: target.to_string(),
            identity,
        },
        discriminator,
        fields,
    })
}

fn scalar_field(value: SqlValue) -> FieldValue {
    if value.is_null() {
        FieldValue::Null
    } else {
        FieldValue::Scalar(value)
    }
}

fn identity_key(column: &IdentityColumn) -> MappingKey {
    column.member.map_or(MappingKey::DatastoreId, MappingKey::Member)
}

fn positions(index: &StatementMappingIndex, key: MappingKey) -> &[usize] {
    index
        .mapping(key)
        .map(|mapping| mapping.column_positions.as_slice())
        .unwrap_or_default()
}

/// Value at a 1-based result position.
fn read_at(row: &[SqlValue], position: usize) -> Result<SqlValue> {
    position
        .checked_sub(1)
        .and_then(|i| row.get(i))
        .cloned()
        .ok_or_else(|| {
            FetchError::Metadata(format!(
                "result row has {} columns, position {position} requested",
                row.len()
            ))
        })
}

fn read_all(row: &[SqlValue], positions: &[usize]) -> Result<Vec<SqlValue>> {
    positions.iter().map(|&position| read_at(row, position)).collect()
}

fn read_first(row: &[SqlValue], positions: &[usize]) -> Result<SqlValue> {
    let position = positions
        .first()
        .ok_or_else(|| FetchError::Metadata(String::from("member has no result column")))?;
    read_at(row, *position)
}

struct Compiler<'a> {
    catalog: &'a MetadataCatalog,
    profile: &'a DialectProfile,
    chain: &'a [&'a ClassMapping],
    primary: usize,
    identity: &'a [IdentityColumn],
    select: SelectStatement,
    aliases: BTreeMap<usize, SqlTable>,
    mapping: StatementClassMapping,
    result_types: Vec<String>,
}

impl Compiler<'_> {
    fn ctx(&self, clause: ClauseKind) -> CompileContext<'_> {
        CompileContext::new(self.profile, clause)
    }

    /// Projects a column and records its logical type at the returned
    /// 1-based position.
    fn project(&mut self, table: &SqlTable, column: &str, logical_type: &str) -> Result<usize> {
        let position = self
            .select
            .select(SqlExpression::column(table, column, logical_type))?;
        if self.result_types.len() < position {
            self.result_types.resize(position, String::new());
        }
        if let Some(slot) = self.result_types.get_mut(position - 1) {
            *slot = logical_type.to_string();
        }
        Ok(position)
    }

    /// Alias of the chain table at `depth`, joining it on identity first.
    fn alias(&mut self, depth: usize) -> Result<SqlTable> {
        if depth == self.primary {
            return Ok(self.select.table().clone());
        }
        if let Some(table) = self.aliases.get(&depth) {
            return Ok(table.clone());
        }
        let table = self.select.new_table_alias(self.chain[depth].table.name.as_str());
        let primary = self.select.table().clone();
        let ctx = CompileContext::new(self.profile, ClauseKind::Join);
        let mut on = Vec::new();
        for column in self.identity {
            let left =
                SqlExpression::column(&primary, column.column.as_str(), &column.logical_type);
            let right = SqlExpression::column(&table, column.column.as_str(), &column.logical_type);
            on.push(left.eq(right, &ctx)?);
        }
        self.select.join(JoinType::Inner, table.clone(), on);
        self.aliases.insert(depth, table.clone());
        Ok(table)
    }

    /// Projects the version column of the nearest table at or above the
    /// primary table that has one.
    fn select_version(&mut self) -> Result<Option<VersionMapping>> {
        let found = self
            .chain
            .iter()
            .enumerate()
            .skip(self.primary)
            .find_map(|(depth, class)| class.table.version.as_ref().map(|v| (depth, v.clone())));
        let Some((depth, version)) = found else {
            return Ok(None);
        };
        let table = self.alias(depth)?;
        let position = self.project(&table, &version.column, &version.logical_type)?;
        self.mapping
            .index
            .set_columns(MappingKey::Version, vec![position]);
        Ok(Some(version))
    }

    fn select_scalar(&mut self, depth: usize, member: &MemberMapping) -> Result<()> {
        let [column] = member.columns.as_slice() else {
            return Err(FetchError::Metadata(format!(
                "scalar member '{}' must have exactly one column",
                member.name
            )));
        };
        let table = self.alias(depth)?;
        let position = self.project(&table, column, &member.logical_type)?;
        self.mapping
            .index
            .set_columns(MappingKey::Member(member.number), vec![position]);
        Ok(())
    }

    /// Identity columns of a relation target, checked against the
    /// relation's foreign-key width.
    fn target_identity(&self, member: &MemberMapping, target: &str) -> Result<Vec<IdentityColumn>> {
        let identity = self.catalog.identity_columns(target)?;
        if identity.len() != member.columns.len() {
            return Err(FetchError::Metadata(format!(
                "relation '{}' has {} foreign-key columns but '{target}' has {} identity columns",
                member.name,
                member.columns.len(),
                identity.len()
            )));
        }
        Ok(identity)
    }

    /// Projects the foreign-key columns of a relation. Returns whether the
    /// target uses surrogate identity.
    fn select_foreign_key(&mut self, depth: usize, member: &MemberMapping) -> Result<bool> {
        let target = member.target().unwrap_or_default();
        let identity = self.target_identity(member, target)?;
        let table = self.alias(depth)?;
        let mut positions = Vec::new();
        for (column, target_column) in member.columns.iter().zip(&identity) {
            positions.push(self.project(&table, column, &target_column.logical_type)?);
        }
        self.mapping
            .index
            .set_columns(MappingKey::Member(member.number), positions);
        Ok(identity.iter().all(|c| c.member.is_none()))
    }

    /// 0 reads only the foreign key, 1 joins the related row.
    fn join_depth(&self, member: &MemberMapping, target: &str) -> Result<u32> {
        if member.recursion_depth == Some(0) {
            return Ok(0);
        }
        let target = self.catalog.class(target)?;
        let ambiguous = target.is_abstract
            && target.table.discriminator.is_none()
            && self.catalog.has_subclasses(&target.name);
        Ok(u32::from(!ambiguous))
    }

    /// Joins the target table of a relation and projects its identity,
    /// discriminator and scalar members into a child layout.
    fn select_related(
        &mut self,
        depth: usize,
        member: &MemberMapping,
        target: &str,
    ) -> Result<(bool, Vec<MappingKey>)> {
        let catalog = self.catalog;
        let identity = self.target_identity(member, target)?;
        let target_class = catalog.class(target)?;
        let owner = self.alias(depth)?;
        let related = self.select.new_table_alias(target_class.table.name.as_str());

        let join_ctx = self.ctx(ClauseKind::Join);
        let mut on = Vec::new();
        for (column, target_column) in member.columns.iter().zip(&identity) {
            let left = SqlExpression::column(&owner, column.as_str(), &target_column.logical_type);
            let right = SqlExpression::column(
                &related,
                target_column.column.as_str(),
                &target_column.logical_type,
            );
            on.push(left.eq(right, &join_ctx)?);
        }
        self.select.join(JoinType::LeftOuter, related.clone(), on);

        let mut child = StatementClassMapping::new(target);
        let mut keys: Vec<MappingKey> = Vec::new();
        let mut key_positions: BTreeMap<MappingKey, Vec<usize>> = BTreeMap::new();
        for column in &identity {
            let key = identity_key(column);
            let position = self.project(&related, &column.column, &column.logical_type)?;
            if !keys.contains(&key) {
                keys.push(key);
            }
            key_positions.entry(key).or_default().push(position);
        }
        for (key, positions) in key_positions {
            child.index.set_columns(key, positions);
        }
        if let Some(discriminator) = &target_class.table.discriminator {
            let position = self.project(&related, discriminator, "string")?;
            child
                .index
                .set_columns(MappingKey::Discriminator, vec![position]);
        }
        for field in &target_class.members {
            let (MemberKind::Scalar, [column]) = (&field.kind, field.columns.as_slice()) else {
                continue;
            };
            if keys.contains(&MappingKey::Member(field.number)) {
                continue;
            }
            let position = self.project(&related, column, &field.logical_type)?;
            child
                .index
                .set_columns(MappingKey::Member(field.number), vec![position]);
        }
        self.mapping.add_child(member.number, child);
        Ok((identity.iter().all(|c| c.member.is_none()), keys))
    }

    /// Identity, tenancy and soft-delete predicates, in that order.
    fn restrict(&mut self) -> Result<()> {
        let primary = self.select.table().clone();
        let ctx = CompileContext::new(self.profile, ClauseKind::Where);
        for column in self.identity {
            let parameter = SqlExpression::parameter(
                identity_key(column),
                column.position,
                &column.logical_type,
            );
            let condition =
                SqlExpression::column(&primary, column.column.as_str(), &column.logical_type)
                    .eq(parameter, &ctx)?;
            self.select.where_and(condition);
        }

        let tenancy = self
            .chain
            .iter()
            .enumerate()
            .find_map(|(depth, class)| class.table.tenancy.as_ref().map(|t| (depth, t.clone())));
        if let Some((depth, tenancy)) = tenancy {
            let table = self.alias(depth)?;
            let column = SqlExpression::column(&table, tenancy.column.as_str(), "string");
            let condition = match &tenancy.allowed {
                Some(allowed) => column.in_list(
                    allowed
                        .iter()
                        .map(|tenant| SqlExpression::literal(tenant.as_str()))
                        .collect(),
                ),
                None => column.eq(SqlExpression::parameter(MappingKey::Tenant, 0, "string"), &ctx)?,
            };
            self.select.where_and(condition);
        }

        let soft_delete = self
            .chain
            .iter()
            .enumerate()
            .find_map(|(depth, class)| {
                class
                    .table
                    .soft_delete
                    .as_ref()
                    .map(|s| (depth, s.clone()))
            });
        if let Some((depth, soft_delete)) = soft_delete {
            let table = self.alias(depth)?;
            let condition = SqlExpression::column(&table, soft_delete.column.as_str(), "bool")
                .eq(SqlExpression::fixed_parameter(MappingKey::SoftDelete, false), &ctx)?;
            self.select.where_and(condition);
        }
        Ok(())
    }

    fn finish(mut self) -> CompiledFetch {
        let unlocked = self.select.render(self.profile, false);
        let locked = self.select.render(self.profile, true);
        self.mapping.index.record_parameters(&unlocked.params);
        CompiledFetch {
            unlocked,
            locked,
            mapping: self.mapping,
            result_types: self.result_types,
        }
    }
}
