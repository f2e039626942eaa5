//=========================================================================
// Alarms
//=========================================================================
//
// Fixed-size bank of one-shot countdown timers.
//
// Architecture:
//   arm(index, seconds, callback) → slot.remaining > 0
//   tick(delta) → decrement every armed slot → FiredAlarm list
//   FiredAlarm::fire(owner) → callback(owner)
//
// Ticking is split in two so that callbacks can receive the owner of the
// bank by `&mut` (and re-arm any slot) without aliasing the bank itself.
// Anything armed while callbacks run is first decremented on the next
// tick.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use thiserror::Error;

//=== Constants ===========================================================

/// Number of alarm slots every bank owns.
pub const ALARM_COUNT: usize = 10;

//=== Types ===============================================================

/// One-shot alarm callback receiving the owner of the bank.
pub type AlarmCallback<T> = Box<dyn FnOnce(&mut T)>;

/// Errors raised when addressing an alarm slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AlarmError {
    #[error("alarm index {index} out of range (bank has {count} slots)")]
    IndexOutOfRange { index: usize, count: usize },
}

struct AlarmSlot<T> {
    remaining: f32,
    callback: Option<AlarmCallback<T>>,
}

impl<T> AlarmSlot<T> {
    fn idle() -> Self {
        Self {
            remaining: 0.0,
            callback: None,
        }
    }

    fn is_armed(&self) -> bool {
        self.remaining > 0.0
    }
}

//=== FiredAlarm ==========================================================

/// An alarm whose countdown crossed zero during the last tick.
pub struct FiredAlarm<T> {
    index: usize,
    callback: Option<AlarmCallback<T>>,
}

impl<T> FiredAlarm<T> {
    /// Slot the alarm was armed in.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Runs the callback against `owner`. Consumes the alarm.
    pub fn fire(self, owner: &mut T) {
        if let Some(callback) = self.callback {
            callback(owner);
        }
    }
}

impl<T> fmt::Debug for FiredAlarm<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FiredAlarm").field("index", &self.index).finish()
    }
}

//=== AlarmBank ===========================================================

/// [`ALARM_COUNT`] countdown slots, each bound to a one-shot callback.
pub struct AlarmBank<T> {
    slots: Vec<AlarmSlot<T>>,
}

impl<T> AlarmBank<T> {
    /// Creates a bank with every slot idle.
    pub fn new() -> Self {
        Self {
            slots: (0..ALARM_COUNT).map(|_| AlarmSlot::idle()).collect(),
        }
    }

    /// Arms slot `index` to fire after `seconds`, replacing whatever was pending.
    ///
    /// A non-positive duration leaves the slot idle; it never fires.
    pub fn arm<F>(&mut self, index: usize, seconds: f32, callback: F) -> Result<(), AlarmError>
    where
        F: FnOnce(&mut T) + 'static,
    {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(AlarmError::IndexOutOfRange { index, count })?;

        slot.remaining = seconds;
        slot.callback = Some(Box::new(callback));
        Ok(())
    }

    /// Disarms slot `index` without firing it.
    pub fn cancel(&mut self, index: usize) -> Result<(), AlarmError> {
        let count = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(AlarmError::IndexOutOfRange { index, count })?;

        *slot = AlarmSlot::idle();
        Ok(())
    }

    /// Advances every armed slot by `delta` seconds.
    ///
    /// Returns the alarms that crossed zero, in slot order. Fired slots go
    /// idle; nothing repeats.
    pub fn tick(&mut self, delta: f32) -> Vec<FiredAlarm<T>> {
        let mut fired = Vec::new();

        for (index, slot) in self.slots.iter_mut().enumerate() {
            if !slot.is_armed() {
                continue;
            }

            slot.remaining -= delta;
            if slot.remaining <= 0.0 {
                slot.remaining = 0.0;
                fired.push(FiredAlarm {
                    index,
                    callback: slot.callback.take(),
                });
            }
        }

        fired
    }

    /// Seconds left on slot `index`; zero when idle.
    pub fn remaining(&self, index: usize) -> Result<f32, AlarmError> {
        self.slots
            .get(index)
            .map(|slot| slot.remaining.max(0.0))
            .ok_or(AlarmError::IndexOutOfRange {
                index,
                count: self.slots.len(),
            })
    }

    /// Returns `true` if slot `index` is counting down.
    pub fn is_armed(&self, index: usize) -> bool {
        self.slots.get(index).is_some_and(AlarmSlot::is_armed)
    }

    /// Number of slots counting down.
    pub fn armed_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_armed()).count()
    }
}

impl<T> Default for AlarmBank<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AlarmBank<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining: Vec<f32> = self.slots.iter().map(|slot| slot.remaining).collect();
        f.debug_struct("AlarmBank").field("remaining", &remaining).finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        hits: Vec<usize>,
        bank: AlarmBank<Counter>,
    }

    impl Counter {
        fn tick(&mut self, delta: f32) {
            for alarm in self.bank.tick(delta) {
                alarm.fire(self);
            }
        }
    }

    #[test]
    fn fires_exactly_once_when_duration_elapses() {
        let mut owner = Counter::default();
        owner.bank.arm(0, 1.0, |c: &mut Counter| c.hits.push(0)).unwrap();

        owner.tick(1.0);
        assert_eq!(owner.hits, vec![0]);

        owner.tick(1.0);
        owner.tick(5.0);
        assert_eq!(owner.hits, vec![0]);
        assert!(!owner.bank.is_armed(0));
    }

    #[test]
    fn partial_ticks_accumulate() {
        let mut owner = Counter::default();
        owner.bank.arm(3, 0.5, |c: &mut Counter| c.hits.push(3)).unwrap();

        owner.tick(0.2);
        assert!(owner.hits.is_empty());
        assert!((owner.bank.remaining(3).unwrap() - 0.3).abs() < 1e-6);

        owner.tick(0.4);
        assert_eq!(owner.hits, vec![3]);
        assert_eq!(owner.bank.remaining(3).unwrap(), 0.0);
    }

    #[test]
    fn simultaneous_alarms_fire_in_slot_order() {
        let mut owner = Counter::default();
        owner.bank.arm(7, 0.1, |c: &mut Counter| c.hits.push(7)).unwrap();
        owner.bank.arm(2, 0.1, |c: &mut Counter| c.hits.push(2)).unwrap();
        owner.bank.arm(5, 0.05, |c: &mut Counter| c.hits.push(5)).unwrap();

        owner.tick(0.2);
        assert_eq!(owner.hits, vec![2, 5, 7]);
    }

    #[test]
    fn rearm_inside_callback_waits_for_next_tick() {
        fn rearm(c: &mut Counter) {
            c.hits.push(c.hits.len());
            if c.hits.len() < 3 {
                c.bank.arm(0, 1.0, rearm).unwrap();
            }
        }

        let mut owner = Counter::default();
        owner.bank.arm(0, 1.0, rearm).unwrap();

        owner.tick(10.0);
        assert_eq!(owner.hits.len(), 1);
        assert!(owner.bank.is_armed(0));

        owner.tick(1.0);
        owner.tick(1.0);
        owner.tick(1.0);
        assert_eq!(owner.hits, vec![0, 1, 2]);
    }

    #[test]
    fn arming_a_later_slot_from_callback_does_not_fire_this_tick() {
        let mut owner = Counter::default();
        owner
            .bank
            .arm(0, 0.1, |c: &mut Counter| {
                c.hits.push(0);
                c.bank.arm(1, 0.05, |c: &mut Counter| c.hits.push(1)).unwrap();
            })
            .unwrap();

        owner.tick(1.0);
        assert_eq!(owner.hits, vec![0]);

        owner.tick(1.0);
        assert_eq!(owner.hits, vec![0, 1]);
    }

    #[test]
    fn rearm_overwrites_pending_alarm() {
        let mut owner = Counter::default();
        owner.bank.arm(1, 0.5, |c: &mut Counter| c.hits.push(100)).unwrap();
        owner.bank.arm(1, 2.0, |c: &mut Counter| c.hits.push(1)).unwrap();

        owner.tick(1.0);
        assert!(owner.hits.is_empty());

        owner.tick(1.0);
        assert_eq!(owner.hits, vec![1]);
    }

    #[test]
    fn non_positive_duration_never_fires() {
        let mut owner = Counter::default();
        owner.bank.arm(0, 0.0, |c: &mut Counter| c.hits.push(0)).unwrap();
        owner.bank.arm(1, -1.0, |c: &mut Counter| c.hits.push(1)).unwrap();

        owner.tick(1.0);
        assert!(owner.hits.is_empty());
        assert_eq!(owner.bank.armed_count(), 0);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut bank: AlarmBank<()> = AlarmBank::new();
        let err = bank.arm(ALARM_COUNT, 1.0, |_| {}).unwrap_err();
        assert_eq!(
            err,
            AlarmError::IndexOutOfRange {
                index: ALARM_COUNT,
                count: ALARM_COUNT
            }
        );
        assert!(bank.cancel(ALARM_COUNT + 3).is_err());
        assert!(bank.remaining(ALARM_COUNT).is_err());
    }

    #[test]
    fn cancel_disarms_without_firing() {
        let mut owner = Counter::default();
        owner.bank.arm(4, 0.1, |c: &mut Counter| c.hits.push(4)).unwrap();
        owner.bank.cancel(4).unwrap();

        owner.tick(1.0);
        assert!(owner.hits.is_empty());
    }

    #[test]
    fn unit_owner_gives_zero_argument_alarms() {
        use std::cell::Cell;
        use std::rc::Rc;

        let fired = Rc::new(Cell::new(0));
        let seen = Rc::clone(&fired);

        let mut bank: AlarmBank<()> = AlarmBank::new();
        bank.arm(0, 0.25, move |_| seen.set(seen.get() + 1)).unwrap();

        for alarm in bank.tick(0.25) {
            alarm.fire(&mut ());
        }
        assert_eq!(fired.get(), 1);
    }
}
