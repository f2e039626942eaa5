//=========================================================================
// Object Registry
//=========================================================================
//
// Owns the live objects of one scene plus the deferred add/remove
// buffers that keep the live list stable while it is being iterated.
//
// Frame algorithm (fixed order):
//   1. begin_frame()  add-buffer    → live        (reconcile adds)
//   2. update()       alarms + hooks, live order  (spawns are buffered)
//   3. render()       active actors, stable depth sort
//   4. end_frame()    remove-buffer → dropped     (reconcile removals)
//
// An object despawned in step 2 is still drawn in step 3 of the same
// frame and is gone from every later frame. An object spawned in step 2
// first takes part in the next frame.
//
// Identities go back to the shared pool only in step 4 of the registry
// that owned them, once the object has actually left the live list.
// Registries of scenes that are not running hold on to their leaving
// objects and their identities until they run again.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::{downcast_mut, downcast_ref, GameObject, ObjectCore};
use crate::core::identity::{IdentityPool, ObjectId};
use crate::core::math::Vec2;
use crate::core::render::Canvas;
use crate::core::resource::ResourceLoader;

//=== ObjectKind ==========================================================

/// Capability class of an object, fixed at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Updated only.
    Plain,
    /// Updated and rendered.
    Actor,
}

struct Entry {
    id: ObjectId,
    kind: ObjectKind,
    object: Box<dyn GameObject>,
}

impl Entry {
    fn object(&self) -> &dyn GameObject {
        self.object.as_ref()
    }

    fn object_mut(&mut self) -> &mut dyn GameObject {
        self.object.as_mut()
    }
}

fn stage<T, F>(identities: &mut IdentityPool, buffer: &mut Vec<Entry>, factory: F) -> ObjectId
where
    T: GameObject,
    F: FnOnce(ObjectCore) -> T,
{
    let id = identities.allocate();
    let object = factory(ObjectCore::new(id));
    let kind = if object.actor().is_some() {
        ObjectKind::Actor
    } else {
        ObjectKind::Plain
    };

    debug!("Spawned object {} as {:?}", id, kind);
    buffer.push(Entry {
        id,
        kind,
        object: Box::new(object),
    });
    id
}

//=== ObjectEnv ===========================================================

/// Shared state a registry needs while running a frame.
pub struct ObjectEnv<'a> {
    pub identities: &'a mut IdentityPool,
    pub assets: &'a ResourceLoader,
    pub ticks: u64,
}

impl<'a> ObjectEnv<'a> {
    pub fn new(identities: &'a mut IdentityPool, assets: &'a ResourceLoader, ticks: u64) -> Self {
        Self {
            identities,
            assets,
            ticks,
        }
    }
}

//=== Peers ===============================================================

/// The live list minus the object currently being updated.
#[derive(Clone, Copy)]
struct Peers<'a> {
    before: &'a [Entry],
    after: &'a [Entry],
}

impl<'a> Peers<'a> {
    fn iter(self) -> impl Iterator<Item = &'a dyn GameObject> + 'a {
        self.before.iter().chain(self.after.iter()).map(Entry::object)
    }
}

//=== ObjectCommands ======================================================

/// Handle given to object hooks during the update pass.
///
/// Spawns and despawns issued here are buffered; the live list is never
/// touched while it is being iterated. The other live objects can be read
/// through the query methods. The object being updated is not among them.
pub struct ObjectCommands<'a> {
    identities: &'a mut IdentityPool,
    assets: &'a ResourceLoader,
    ticks: u64,
    peers: Peers<'a>,
    add_buffer: &'a mut Vec<Entry>,
    despawn_requests: &'a mut Vec<ObjectId>,
}

impl ObjectCommands<'_> {
    //--- Mutation ---------------------------------------------------------

    /// Queues a new object. It joins the live list next frame.
    pub fn spawn<T, F>(&mut self, factory: F) -> ObjectId
    where
        T: GameObject,
        F: FnOnce(ObjectCore) -> T,
    {
        stage(self.identities, self.add_buffer, factory)
    }

    /// Requests despawn of `id` once the update pass finishes.
    pub fn despawn(&mut self, id: ObjectId) {
        self.despawn_requests.push(id);
    }

    //--- Context ----------------------------------------------------------

    /// Loaded assets, for building sprites.
    pub fn assets(&self) -> &ResourceLoader {
        self.assets
    }

    /// Application tick counter.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    //--- Peer Queries -----------------------------------------------------

    /// Every other live object, in update order.
    pub fn peers(&self) -> impl Iterator<Item = &dyn GameObject> + '_ {
        self.peers.iter()
    }

    /// Another live object by identity.
    pub fn get(&self, id: ObjectId) -> Option<&dyn GameObject> {
        self.peers().find(|object| object.core().id() == id)
    }

    /// First other live object of type `T`.
    pub fn find<T: GameObject>(&self) -> Option<&T> {
        self.peers().find_map(downcast_ref::<T>)
    }

    /// Every other live object of type `T`.
    pub fn find_all<T: GameObject>(&self) -> impl Iterator<Item = &T> + '_ {
        self.peers().filter_map(downcast_ref::<T>)
    }

    /// Other live object of type `T` closest to `from`.
    pub fn find_nearest<T: GameObject>(&self, from: Vec2) -> Option<&T> {
        nearest(self.find_all::<T>(), from)
    }
}

//=== ObjectRegistry ======================================================

/// Live object list with deferred mutation.
#[derive(Default)]
pub struct ObjectRegistry {
    live: Vec<Entry>,
    add_buffer: Vec<Entry>,
    remove_buffer: Vec<ObjectId>,
    despawn_requests: Vec<ObjectId>,
}

impl ObjectRegistry {
    //--- Construction -----------------------------------------------------

    pub fn new() -> Self {
        Self::default()
    }

    //--- Mutation ---------------------------------------------------------

    /// Allocates an identity, builds the object and buffers it.
    ///
    /// The identity is returned immediately; the object is live only
    /// after the next [`begin_frame`](Self::begin_frame).
    pub fn spawn<T, F>(&mut self, identities: &mut IdentityPool, factory: F) -> ObjectId
    where
        T: GameObject,
        F: FnOnce(ObjectCore) -> T,
    {
        stage(identities, &mut self.add_buffer, factory)
    }

    /// Marks a live object for removal at the end of the frame.
    ///
    /// Its identity is released by [`end_frame`](Self::end_frame), when the
    /// object actually leaves. Returns `false` (no-op) when `id` is not
    /// live or already leaving.
    pub fn despawn(&mut self, id: ObjectId) -> bool {
        let Some(entry) = self.live.iter_mut().find(|entry| entry.id == id) else {
            debug!("Despawn of {} ignored, object is not live", id);
            return false;
        };

        if self.remove_buffer.contains(&id) {
            trace!("Object {} already scheduled for removal", id);
            return false;
        }

        entry.object.core_mut().queue_dispose();
        self.remove_buffer.push(id);
        debug!("Despawned object {}", id);
        true
    }

    //--- Frame Phases -----------------------------------------------------

    /// Moves buffered spawns into the live list.
    pub fn begin_frame(&mut self) {
        if self.add_buffer.is_empty() {
            return;
        }

        trace!("Reconciling {} spawned objects", self.add_buffer.len());
        self.live.append(&mut self.add_buffer);
    }

    /// Ticks alarms and runs the update hooks of every live object.
    ///
    /// Inactive actors are skipped. Objects that requested disposal
    /// during the pass are despawned once it completes.
    pub fn update(&mut self, env: &mut ObjectEnv<'_>, delta: f32) {
        let Self {
            live,
            add_buffer,
            despawn_requests,
            ..
        } = self;

        for index in 0..live.len() {
            let (before, rest) = live.split_at_mut(index);
            let Some((entry, after)) = rest.split_first_mut() else {
                break;
            };

            let kind = entry.kind;
            if kind == ObjectKind::Actor && !is_active(entry.object()) {
                continue;
            }

            let mut cmds = ObjectCommands {
                identities: &mut *env.identities,
                assets: env.assets,
                ticks: env.ticks,
                peers: Peers {
                    before: &*before,
                    after: &*after,
                },
                add_buffer: &mut *add_buffer,
                despawn_requests: &mut *despawn_requests,
            };
            update_object(entry.object_mut(), kind, &mut cmds, delta);
        }

        let mut requests = std::mem::take(&mut self.despawn_requests);
        requests.extend(
            self.live
                .iter()
                .filter(|entry| entry.object.core().will_dispose())
                .map(|entry| entry.id),
        );

        for id in requests {
            self.despawn(id);
        }
    }

    /// Draws every active actor, lowest depth first.
    ///
    /// The sort is stable, so equal depths keep live-list order.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        let mut actors: Vec<&Entry> = self
            .live
            .iter()
            .filter(|entry| entry.kind == ObjectKind::Actor && is_active(entry.object()))
            .collect();

        actors.sort_by(|a, b| depth_of(a).total_cmp(&depth_of(b)));

        for entry in actors {
            render_object(entry.object(), canvas);
        }
    }

    /// Drops everything in the remove buffer and returns those identities
    /// to the pool, reusable from the next frame.
    pub fn end_frame(&mut self, identities: &mut IdentityPool) {
        if self.remove_buffer.is_empty() {
            return;
        }

        let removed: HashSet<ObjectId> = self.remove_buffer.drain(..).collect();
        trace!("Reconciling {} removed objects", removed.len());
        self.live.retain(|entry| !removed.contains(&entry.id));

        for id in removed {
            identities.release(id);
        }
        identities.commit();
    }

    /// Runs all four phases.
    pub fn run_frame(&mut self, env: &mut ObjectEnv<'_>, canvas: &mut dyn Canvas, delta: f32) {
        self.begin_frame();
        self.update(env, delta);
        self.render(canvas);
        self.end_frame(env.identities);
    }

    /// Drops every object, live or buffered, and releases their identities.
    pub fn clear(&mut self, identities: &mut IdentityPool) {
        for entry in self.live.drain(..).chain(self.add_buffer.drain(..)) {
            identities.release(entry.id);
        }

        self.remove_buffer.clear();
        self.despawn_requests.clear();
        identities.commit();
    }

    //--- Queries ----------------------------------------------------------

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether the live list is empty. Pending spawns are not counted.
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of spawned objects waiting for the next frame.
    pub fn pending_len(&self) -> usize {
        self.add_buffer.len()
    }

    /// Whether `id` is in the live list.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.live.iter().any(|entry| entry.id == id)
    }

    /// Whether `id` was spawned but is not live yet.
    pub fn is_pending(&self, id: ObjectId) -> bool {
        self.add_buffer.iter().any(|entry| entry.id == id)
    }

    /// Whether `id` is live but scheduled for removal.
    pub fn is_leaving(&self, id: ObjectId) -> bool {
        self.remove_buffer.contains(&id)
    }

    /// Capability class of live object `id`.
    pub fn kind(&self, id: ObjectId) -> Option<ObjectKind> {
        self.entry(id).map(|entry| entry.kind)
    }

    pub fn get(&self, id: ObjectId) -> Option<&dyn GameObject> {
        self.entry(id).map(Entry::object)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut dyn GameObject> {
        self.live
            .iter_mut()
            .find(|entry| entry.id == id)
            .map(Entry::object_mut)
    }

    /// Live object `id` as its concrete type.
    pub fn get_as<T: GameObject>(&self, id: ObjectId) -> Option<&T> {
        self.get(id).and_then(downcast_ref::<T>)
    }

    pub fn get_as_mut<T: GameObject>(&mut self, id: ObjectId) -> Option<&mut T> {
        self.get_mut(id).and_then(downcast_mut::<T>)
    }

    /// Live identities in update order.
    pub fn ids(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.live.iter().map(|entry| entry.id)
    }

    /// Live objects in update order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn GameObject> + '_ {
        self.live.iter().map(Entry::object)
    }

    /// First live object of type `T`.
    pub fn find<T: GameObject>(&self) -> Option<&T> {
        self.iter().find_map(downcast_ref::<T>)
    }

    /// Every live object of type `T`.
    pub fn find_all<T: GameObject>(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().filter_map(downcast_ref::<T>)
    }

    /// Live object of type `T` closest to `from`. Ties go to the earlier object.
    pub fn find_nearest<T: GameObject>(&self, from: Vec2) -> Option<&T> {
        nearest(self.find_all::<T>(), from)
    }

    /// Like [`find_nearest`](Self::find_nearest), measured from object
    /// `origin` and never returning it.
    pub fn find_nearest_to<T: GameObject>(&self, origin: ObjectId) -> Option<&T> {
        let from = self.get(origin)?.core().position();
        nearest(
            self.find_all::<T>()
                .filter(|candidate| candidate.core().id() != origin),
            from,
        )
    }

    fn entry(&self, id: ObjectId) -> Option<&Entry> {
        self.live.iter().find(|entry| entry.id == id)
    }
}

//=== Internal Helpers ====================================================

fn is_active(object: &dyn GameObject) -> bool {
    object.actor().is_some_and(|actor| actor.is_active())
}

fn depth_of(entry: &Entry) -> f32 {
    entry.object.actor().map_or(0.0, |actor| actor.depth())
}

/// Closest candidate to `from`; the first one wins ties.
fn nearest<'a, T, I>(candidates: I, from: Vec2) -> Option<&'a T>
where
    T: GameObject,
    I: Iterator<Item = &'a T>,
{
    candidates.min_by(|a, b| {
        let da = a.core().distance_to(from);
        let db = b.core().distance_to(from);
        da.total_cmp(&db)
    })
}

fn update_object(
    object: &mut dyn GameObject,
    kind: ObjectKind,
    cmds: &mut ObjectCommands<'_>,
    delta: f32,
) {
    object.core_mut().tick_alarms(delta);
    if kind == ObjectKind::Actor {
        object.update_depth();
    }
    object.pre_step(cmds, delta);
    object.step(cmds, delta);
    object.post_step(cmds, delta);
}

fn render_object(object: &dyn GameObject, canvas: &mut dyn Canvas) {
    if let Some(sprite) = object.actor().and_then(|actor| actor.sprite()) {
        canvas.draw_sprite(sprite, object.core().position());
    }
    object.draw(canvas);
}

//=========================================================================
// Unit Tests
//=========================================================================
