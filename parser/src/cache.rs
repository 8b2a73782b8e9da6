//! Compiled context schemas, memoized by context type.
//!
//! Compiling a [`Context`] walks its declared command types, builds the
//! owned [`ContextSchema`] the engine runs on, and validates it. The result
//! only depends on the type, so it is computed once per process and shared
//! through an [`Arc`].

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use command_binder_core::{
    CommandSchema, ContextSchema, MAX_COMMAND_DEPTH, SchemaError, validate_context,
};
use tracing::debug;

use crate::command::{CommandType, Context, ContextDeclaration};
use crate::resolve::Resolution;

#[derive(Debug)]
struct CommandNode {
    ty: CommandType,
    children: Vec<CommandNode>,
}

/// A validated context schema together with the command types behind it.
#[derive(Debug)]
pub struct CompiledContext {
    schema: ContextSchema,
    default_command: Option<CommandNode>,
    commands: Vec<CommandNode>,
}

impl CompiledContext {
    /// Compiles and validates a context declaration.
    ///
    /// Fails with the first validation error, or with
    /// [`SchemaError::CommandCycle`] when a command type nests itself.
    pub fn compile(declaration: ContextDeclaration) -> Result<Self, SchemaError> {
        let mut stack = Vec::new();

        let (default_schema, default_command) = match declaration.default_command {
            Some(ty) => {
                let (schema, node) = compile_command(ty, &mut stack)?;
                (Some(schema), Some(node))
            }
            None => (None, None),
        };

        let mut schemas = Vec::with_capacity(declaration.commands.len());
        let mut commands = Vec::with_capacity(declaration.commands.len());
        for ty in declaration.commands {
            let (schema, node) = compile_command(ty, &mut stack)?;
            schemas.push(schema);
            commands.push(node);
        }

        let schema = ContextSchema {
            description: declaration.description,
            default_command: default_schema,
            commands: schemas,
            options: declaration.options,
        };
        if let Some(err) = validate_context(&schema).into_iter().next() {
            return Err(err);
        }

        Ok(Self {
            schema,
            default_command,
            commands,
        })
    }

    pub fn schema(&self) -> &ContextSchema {
        &self.schema
    }

    /// The command type a resolution points at.
    pub fn command_type(&self, resolution: &Resolution) -> Option<CommandType> {
        if resolution.is_default {
            return self.default_command.as_ref().map(|node| node.ty);
        }
        let (first, rest) = resolution.path.split_first()?;
        let mut node = self.commands.get(*first)?;
        for index in rest {
            node = node.children.get(*index)?;
        }
        Some(node.ty)
    }
}

fn compile_command(
    ty: CommandType,
    stack: &mut Vec<(CommandType, String)>,
) -> Result<(CommandSchema, CommandNode), SchemaError> {
    let declaration = ty.declare();
    let name = declaration.schema.name.clone();

    if stack.iter().any(|(seen, _)| *seen == ty) {
        let mut path: Vec<&str> = stack.iter().map(|(_, n)| n.as_str()).collect();
        path.push(&name);
        return Err(SchemaError::CommandCycle(path.join(" -> ")));
    }
    if stack.len() >= MAX_COMMAND_DEPTH {
        let path: Vec<&str> = stack.iter().map(|(_, n)| n.as_str()).collect();
        return Err(SchemaError::TooDeep(path.join(" ")));
    }

    stack.push((ty, name));
    let mut schema = declaration.schema;
    let mut children = Vec::with_capacity(declaration.commands.len());
    for child in declaration.commands {
        let (child_schema, node) = compile_command(child, stack)?;
        schema.commands.push(child_schema);
        children.push(node);
    }
    stack.pop();

    Ok((schema, CommandNode { ty, children }))
}

/// Process-wide memo of compiled contexts keyed by context type.
///
/// Lookups take a read lock; a miss compiles outside the lock and inserts
/// under a write lock, keeping the first entry if two threads race.
#[derive(Debug, Default)]
pub struct SchemaCache {
    contexts: RwLock<HashMap<TypeId, Arc<CompiledContext>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared cache used by parsers that were not given one.
    pub fn global() -> Arc<SchemaCache> {
        static GLOBAL: OnceLock<Arc<SchemaCache>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(SchemaCache::new())))
    }

    /// Returns the compiled schema for `C`, compiling it on first use.
    /// Invalid schemas are not cached.
    pub fn context<C: Context>(&self) -> Result<Arc<CompiledContext>, SchemaError> {
        let id = TypeId::of::<C>();
        if let Some(hit) = self
            .contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
        {
            return Ok(Arc::clone(hit));
        }

        let compiled = Arc::new(CompiledContext::compile(C::declare())?);
        debug!(context = type_name::<C>(), "Compiled context schema");

        let mut contexts = self
            .contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(contexts.entry(id).or_insert(compiled)))
    }

    pub fn len(&self) -> usize {
        self.contexts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.contexts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
