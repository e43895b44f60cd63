//! Ordered, named hook registry and the three dispatch flavors.
//!
//! Hooks are plain data: a name, the effect that owns them, a priority and a
//! single-use flag. Dispatch walks a snapshot of the list so a callback may
//! unregister itself (or a sibling) without disturbing the pass.

use crate::battle::effects::EffectId;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookKind {
    BeforeMove,
    OnStatCalc,
    OnDamageCalc,
    AfterDamage,
    TurnEnd,
    OnFaint,
    OnOpponentFaint,
    OnPriorityCalc,
}

impl HookKind {
    pub fn label(self) -> &'static str {
        match self {
            HookKind::BeforeMove => "before_move",
            HookKind::OnStatCalc => "on_stat_calc",
            HookKind::OnDamageCalc => "on_damage_calc",
            HookKind::AfterDamage => "after_damage",
            HookKind::TurnEnd => "turn_end",
            HookKind::OnFaint => "on_faint",
            HookKind::OnOpponentFaint => "on_opponent_faint",
            HookKind::OnPriorityCalc => "on_priority_calc",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEntry {
    pub name: String,
    pub owner: EffectId,
    pub priority: i32,
    /// Single-use hooks are dropped after they fire once.
    pub persistent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookRegistry {
    hooks: BTreeMap<HookKind, Vec<HookEntry>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a hook after every entry of lower or equal priority. A hook
    /// already registered under `name` for this kind is replaced.
    pub fn register(
        &mut self,
        kind: HookKind,
        name: impl Into<String>,
        owner: EffectId,
        priority: i32,
        persistent: bool,
    ) {
        let name = name.into();
        let entries = self.hooks.entry(kind).or_default();
        if let Some(existing) = entries.iter().position(|entry| entry.name == name) {
            trace!(hook = %name, %kind, "replacing hook with duplicate name");
            entries.remove(existing);
        }
        let position = entries.partition_point(|entry| entry.priority <= priority);
        trace!(hook = %name, %kind, priority, persistent, "register hook");
        entries.insert(
            position,
            HookEntry {
                name,
                owner,
                priority,
                persistent,
            },
        );
    }

    /// Removes a hook by name. Returns whether anything was removed.
    pub fn unregister(&mut self, kind: HookKind, name: &str) -> bool {
        let Some(entries) = self.hooks.get_mut(&kind) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| entry.name != name);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.hooks.remove(&kind);
        }
        if removed {
            trace!(hook = %name, %kind, "unregister hook");
        }
        removed
    }

    /// Removes every hook owned by `owner`, across all kinds.
    pub fn unregister_owner(&mut self, owner: EffectId) -> usize {
        let mut removed = 0;
        for entries in self.hooks.values_mut() {
            let before = entries.len();
            entries.retain(|entry| entry.owner != owner);
            removed += before - entries.len();
        }
        self.hooks.retain(|_, entries| !entries.is_empty());
        removed
    }

    pub fn is_registered(&self, kind: HookKind, name: &str) -> bool {
        self.entries(kind).iter().any(|entry| entry.name == name)
    }

    pub fn entries(&self, kind: HookKind) -> &[HookEntry] {
        self.hooks.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn snapshot(&self, kind: HookKind) -> Vec<HookEntry> {
        self.entries(kind).to_vec()
    }

    /// Every (kind, name) pair, in kind then priority order.
    pub fn names(&self) -> Vec<(HookKind, String)> {
        self.hooks
            .iter()
            .flat_map(|(kind, entries)| entries.iter().map(move |entry| (*kind, entry.name.clone())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Read-only value fold in priority order. Single-use flags are not
    /// consumed here.
    pub fn fold<V>(&self, kind: HookKind, initial: V, mut step: impl FnMut(&HookEntry, V) -> V) -> V {
        self.entries(kind)
            .iter()
            .fold(initial, |value, entry| step(entry, value))
    }
}

/// Anything that owns one or more registries addressable by a holder key.
pub trait HookHost {
    type Holder: Copy + fmt::Debug;

    fn registry(&self, holder: Self::Holder) -> &HookRegistry;
    fn registry_mut(&mut self, holder: Self::Holder) -> &mut HookRegistry;
}

fn still_registered<H: HookHost>(host: &H, holder: H::Holder, kind: HookKind, entry: &HookEntry) -> bool {
    host.registry(holder).is_registered(kind, &entry.name)
}

fn retire_if_single_use<H: HookHost>(host: &mut H, holder: H::Holder, kind: HookKind, entry: &HookEntry) {
    if !entry.persistent {
        host.registry_mut(holder).unregister(kind, &entry.name);
    }
}

/// Folds every hook over `initial` in priority order.
pub fn dispatch_value<H, V, F>(host: &mut H, holder: H::Holder, kind: HookKind, initial: V, mut callback: F) -> V
where
    H: HookHost,
    F: FnMut(&mut H, &HookEntry, V) -> V,
{
    let snapshot = host.registry(holder).snapshot(kind);
    let mut value = initial;
    for entry in &snapshot {
        if !still_registered(host, holder, kind, entry) {
            continue;
        }
        value = callback(host, entry, value);
        retire_if_single_use(host, holder, kind, entry);
    }
    value
}

/// Returns `false` as soon as any hook vetoes; later hooks do not run.
pub fn dispatch_gate<H, F>(host: &mut H, holder: H::Holder, kind: HookKind, mut callback: F) -> bool
where
    H: HookHost,
    F: FnMut(&mut H, &HookEntry) -> bool,
{
    let snapshot = host.registry(holder).snapshot(kind);
    for entry in &snapshot {
        if !still_registered(host, holder, kind, entry) {
            continue;
        }
        let allowed = callback(host, entry);
        retire_if_single_use(host, holder, kind, entry);
        if !allowed {
            trace!(hook = %entry.name, ?holder, "gate vetoed");
            return false;
        }
    }
    true
}

/// Fires every hook for its side effects. The callback reports whether the
/// hook took effect; a single-use hook only retires once it has.
pub fn dispatch_event<H, F>(host: &mut H, holder: H::Holder, kind: HookKind, mut callback: F)
where
    H: HookHost,
    F: FnMut(&mut H, &HookEntry) -> bool,
{
    let snapshot = host.registry(holder).snapshot(kind);
    for entry in &snapshot {
        if !still_registered(host, holder, kind, entry) {
            continue;
        }
        if callback(host, entry) {
            retire_if_single_use(host, holder, kind, entry);
        }
    }
}

/// Like [`dispatch_event`] across several holders at once, interleaving
/// their hooks by priority. Equal priorities keep holder order.
pub fn dispatch_event_merged<H, F>(host: &mut H, holders: &[H::Holder], kind: HookKind, mut callback: F)
where
    H: HookHost,
    F: FnMut(&mut H, H::Holder, &HookEntry) -> bool,
{
    let mut merged: Vec<(H::Holder, HookEntry)> = holders
        .iter()
        .flat_map(|holder| {
            host.registry(*holder)
                .snapshot(kind)
                .into_iter()
                .map(move |entry| (*holder, entry))
        })
        .collect();
    merged.sort_by_key(|(_, entry)| entry.priority);

    for (holder, entry) in &merged {
        if !still_registered(host, *holder, kind, entry) {
            continue;
        }
        if callback(host, *holder, entry) {
            retire_if_single_use(host, *holder, kind, entry);
        }
    }
}
