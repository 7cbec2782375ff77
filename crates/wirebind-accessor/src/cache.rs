//! Build-once accessor cache.
//!
//! Lookups share a read lock. A miss serializes on a single compile lock,
//! re-checks, compiles and then publishes, so each key is compiled at most
//! once for the lifetime of the cache. Failed compilations are never cached.
//!
//! A key is the whole binding: host type, member name, declared value type,
//! capability and codec selection. Two descriptors that share a name but
//! differ in any of these get separate sets.

use std::any::{type_name, Any, TypeId};
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use wirebind_codec::{CodecRegistry, ValueType};

use crate::access::Access;
use crate::compiler::{AccessorCompiler, CompiledAccessorSet};
use crate::error::{BindingError, Result};
use crate::member::{CodecSelection, MemberDescriptor, MemberLocator};

type Erased = Arc<dyn Any + Send + Sync>;

/// Identity of one cached accessor set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessorKey {
    host: TypeId,
    member: Cow<'static, str>,
    value_type: ValueType,
    readable: bool,
    writable: bool,
    codec: CodecSelection,
}

impl AccessorKey {
    pub fn of<H: 'static>(member: &MemberDescriptor<H>) -> Self {
        Self {
            host: TypeId::of::<H>(),
            member: member.name_cow().clone(),
            value_type: member.value_type(),
            readable: member.is_readable(),
            writable: member.is_writable(),
            codec: member.codec().clone(),
        }
    }

    pub fn host(&self) -> TypeId {
        self.host
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    pub fn codec(&self) -> &CodecSelection {
        &self.codec
    }
}

/// The compiled accessor sets of every member of `H`, in locator order.
pub struct AccessorTable<H> {
    sets: Vec<Arc<CompiledAccessorSet<H>>>,
}

impl<H> AccessorTable<H> {
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<CompiledAccessorSet<H>>> {
        self.sets.get(index)
    }

    pub fn by_name(&self, member: &str) -> Option<&Arc<CompiledAccessorSet<H>>> {
        self.sets.iter().find(|set| set.member() == member)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CompiledAccessorSet<H>>> {
        self.sets.iter()
    }

    /// Member names in order.
    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.member())
    }

    /// Check that every member offers the capabilities in `access`.
    pub fn require(&self, access: Access) -> std::result::Result<(), BindingError> {
        for set in &self.sets {
            if access.needs_read() && !set.is_readable() {
                return Err(BindingError::NotReadable {
                    host: type_name::<H>(),
                    member: set.member().to_string(),
                });
            }
            if access.needs_write() && !set.is_writable() {
                return Err(BindingError::NotWritable {
                    host: type_name::<H>(),
                    member: set.member().to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<H> fmt::Debug for AccessorTable<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.sets.iter()).finish()
    }
}

/// Append-only cache of compiled accessor sets and whole-type tables.
pub struct AccessorCache {
    compiler: AccessorCompiler,
    members: RwLock<HashMap<AccessorKey, Erased>>,
    tables: RwLock<HashMap<TypeId, Erased>>,
    compile_lock: Mutex<()>,
    compilations: AtomicUsize,
}

impl AccessorCache {
    pub fn new(registry: Arc<CodecRegistry>) -> Self {
        Self {
            compiler: AccessorCompiler::new(registry),
            members: RwLock::new(HashMap::new()),
            tables: RwLock::new(HashMap::new()),
            compile_lock: Mutex::new(()),
            compilations: AtomicUsize::new(0),
        }
    }

    pub fn compiler(&self) -> &AccessorCompiler {
        &self.compiler
    }

    /// Return the cached set for `member`, compiling it on first use.
    pub fn get_or_compile<H: 'static>(
        &self,
        member: &MemberDescriptor<H>,
    ) -> Result<Arc<CompiledAccessorSet<H>>> {
        let key = AccessorKey::of(member);
        if let Some(set) = self.lookup::<H>(&key) {
            tracing::trace!(host = type_name::<H>(), member = member.name(), "accessor cache hit");
            return Ok(set);
        }

        let _guard = self.compile_lock.lock();
        if let Some(set) = self.lookup::<H>(&key) {
            return Ok(set);
        }
        let set = Arc::new(self.compiler.compile(member)?);
        self.members.write().insert(key, set.clone() as Erased);
        self.compilations.fetch_add(1, Ordering::Relaxed);
        Ok(set)
    }

    /// The cached set compiled for exactly this descriptor, if any.
    pub fn get<H: 'static>(&self, member: &MemberDescriptor<H>) -> Option<Arc<CompiledAccessorSet<H>>> {
        self.lookup::<H>(&AccessorKey::of(member))
    }

    pub fn contains<H: 'static>(&self, member: &MemberDescriptor<H>) -> bool {
        self.members.read().contains_key(&AccessorKey::of(member))
    }

    /// Compile every member of `H` and publish its table.
    ///
    /// Either every member compiles and the table plus all member sets are
    /// published together, or nothing about `H` becomes visible.
    pub fn table<H: MemberLocator>(&self) -> Result<Arc<AccessorTable<H>>> {
        if let Some(table) = self.lookup_table::<H>() {
            tracing::trace!(host = type_name::<H>(), "accessor table cache hit");
            return Ok(table);
        }

        let _guard = self.compile_lock.lock();
        if let Some(table) = self.lookup_table::<H>() {
            return Ok(table);
        }

        let members = H::members();
        let (sets, fresh) = match self.build_sets(&members) {
            Ok(built) => built,
            Err(err) => {
                tracing::warn!(host = type_name::<H>(), error = %err, "accessor table rejected");
                return Err(err);
            }
        };

        let table = Arc::new(AccessorTable { sets });
        let published = fresh.len();
        {
            let mut cached = self.members.write();
            for (key, set) in fresh {
                cached.insert(key, set as Erased);
            }
        }
        self.tables
            .write()
            .insert(TypeId::of::<H>(), table.clone() as Erased);
        self.compilations.fetch_add(published, Ordering::Relaxed);

        tracing::debug!(
            host = type_name::<H>(),
            members = table.len(),
            compiled = published,
            "accessor table published"
        );
        Ok(table)
    }

    pub fn has_table<H: 'static>(&self) -> bool {
        self.tables.read().contains_key(&TypeId::of::<H>())
    }

    /// Number of cached member sets.
    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Number of member compilations that were published.
    pub fn compilations(&self) -> usize {
        self.compilations.load(Ordering::Relaxed)
    }

    /// Compile `members` without publishing anything. Caller holds the compile lock.
    #[allow(clippy::type_complexity)]
    fn build_sets<H: 'static>(
        &self,
        members: &[MemberDescriptor<H>],
    ) -> Result<(
        Vec<Arc<CompiledAccessorSet<H>>>,
        Vec<(AccessorKey, Arc<CompiledAccessorSet<H>>)>,
    )> {
        let mut seen = HashSet::with_capacity(members.len());
        let mut sets = Vec::with_capacity(members.len());
        let mut fresh = Vec::new();

        for member in members {
            if !seen.insert(member.name()) {
                return Err(BindingError::DuplicateMember {
                    host: type_name::<H>(),
                    member: member.name().to_string(),
                }
                .into());
            }
            let key = AccessorKey::of(member);
            let set = match self.lookup::<H>(&key) {
                Some(set) => set,
                None => {
                    let set = Arc::new(self.compiler.compile(member)?);
                    fresh.push((key, Arc::clone(&set)));
                    set
                }
            };
            sets.push(set);
        }
        Ok((sets, fresh))
    }

    fn lookup<H: 'static>(&self, key: &AccessorKey) -> Option<Arc<CompiledAccessorSet<H>>> {
        let erased = self.members.read().get(key).cloned()?;
        erased.downcast::<CompiledAccessorSet<H>>().ok()
    }

    fn lookup_table<H: 'static>(&self) -> Option<Arc<AccessorTable<H>>> {
        let erased = self.tables.read().get(&TypeId::of::<H>()).cloned()?;
        erased.downcast::<AccessorTable<H>>().ok()
    }
}

impl fmt::Debug for AccessorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessorCache")
            .field("members", &self.len())
            .field("tables", &self.tables.read().len())
            .field("compilations", &self.compilations())
            .finish()
    }
}
