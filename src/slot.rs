//! Slot scheduler: maps the rotation sequence to a tape slot.
//!
//! Инкремент переворачивает младший нулевой бит и все единицы под ним, поэтому
//! `seq ^ (seq + 1)` - непрерывный ряд единиц от бита 0. Позиция старшего бита
//! этого ряда (1-based) и есть слот: слот 1 каждый второй тик, слот 2 каждый
//! четвёртый, слот k - каждый 2^k-й.

/// 1-based slot for the given sequence value.
#[inline]
pub fn slot_for(sequence: u64) -> u32 {
    let diff = sequence ^ sequence.wrapping_add(1);
    u64::BITS - diff.leading_zeros()
}

/// True when this tick lands on the last tape and the sequence must wrap.
#[inline]
pub fn is_terminal_slot(sequence: u64, tapes: u32) -> bool {
    slot_for(sequence) == tapes
}

/// Sequence value persisted after a successful tick.
pub fn next_sequence(sequence: u64, tapes: u32) -> u64 {
    if is_terminal_slot(sequence, tapes) {
        0
    } else {
        sequence.checked_add(1).unwrap_or(0)
    }
}

/// Number of ticks in one full cycle for `tapes` tapes (2^(tapes-1)).
#[cfg(test)]
pub fn cycle_len(tapes: u32) -> u64 {
    1u64 << tapes.saturating_sub(1).min(63)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_slots_follow_hanoi_order() {
        let got: Vec<u32> = (0..8).map(slot_for).collect();
        assert_eq!(got, vec![1, 2, 1, 3, 1, 2, 1, 4]);
    }

    #[test]
    fn slot_k_first_touched_at_2k_minus_1() {
        for k in 0..31u32 {
            let seq = (1u64 << k) - 1;
            assert_eq!(slot_for(seq), k + 1, "seq={seq}");
        }
    }

    #[test]
    fn slot_one_on_every_even_sequence() {
        for s in (0..200u64).step_by(2) {
            assert_eq!(slot_for(s), 1, "seq={s}");
        }
        for s in (1..200u64).step_by(2) {
            assert!(slot_for(s) >= 2, "seq={s}");
        }
    }

    #[test]
    fn wraps_after_terminal_slot() {
        assert!(is_terminal_slot(1, 2));
        assert_eq!(next_sequence(1, 2), 0);
        assert_eq!(next_sequence(0, 2), 1);
        assert_eq!(next_sequence(2, 3), 3);
        assert_eq!(next_sequence(3, 3), 0);
    }

    #[test]
    fn cycle_stays_within_tape_range() {
        for tapes in 1..=12u32 {
            let mut seq = 0u64;
            let mut ticks = 0u64;
            let mut seen_top = 0;
            loop {
                let slot = slot_for(seq);
                assert!(
                    (1..=tapes).contains(&slot),
                    "tapes={tapes} seq={seq} slot={slot}"
                );
                if slot == tapes {
                    seen_top += 1;
                }
                seq = next_sequence(seq, tapes);
                ticks += 1;
                if seq == 0 {
                    break;
                }
            }
            assert_eq!(ticks, cycle_len(tapes), "tapes={tapes}");
            assert_eq!(seen_top, 1, "last tape must be touched once per cycle");
        }
    }

    #[test]
    fn max_tapes_cycle_fits() {
        let last = cycle_len(31) - 1;
        assert_eq!(slot_for(last), 31);
        assert_eq!(next_sequence(last, 31), 0);
    }
}
