// ── Dashboard figures ──

use std::sync::Arc;

use roombook_types::{Booking, Room, RoomStatus};

/// Headline numbers shown on the overview screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_rooms: usize,
    pub available_rooms: usize,
    /// Bookings that are not cancelled.
    pub active_bookings: usize,
    /// Equipment tags summed over all rooms.
    pub equipment_items: usize,
}

impl Stats {
    pub fn compute(rooms: &[Arc<Room>], bookings: &[Arc<Booking>]) -> Self {
        Self {
            total_rooms: rooms.len(),
            available_rooms: rooms
                .iter()
                .filter(|r| r.status == RoomStatus::Available)
                .count(),
            active_bookings: bookings.iter().filter(|b| b.status.is_active()).count(),
            equipment_items: rooms.iter().map(|r| r.equipment.len()).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roombook_types::BookingStatus;

    fn room(id: &str, status: RoomStatus, equipment: &[&str]) -> Arc<Room> {
        Arc::new(Room {
            id: id.into(),
            code: id.into(),
            name: id.into(),
            capacity: 10,
            equipment: equipment.iter().map(|s| (*s).to_owned()).collect(),
            status,
        })
    }

    fn booking(id: &str, status: BookingStatus) -> Arc<Booking> {
        Arc::new(Booking {
            id: id.into(),
            room_code: "101".into(),
            room_name: "Lab".into(),
            date: "2025-03-01".into(),
            start_time: "10:00".into(),
            end_time: "11:00".into(),
            status,
            organizer: "X".into(),
            note: None,
        })
    }

    #[test]
    fn counts() {
        let rooms = vec![
            room("a", RoomStatus::Available, &["tv", "wifi"]),
            room("b", RoomStatus::Maintenance, &["board"]),
            room("c", RoomStatus::Available, &[]),
        ];
        let bookings = vec![
            booking("1", BookingStatus::Confirmed),
            booking("2", BookingStatus::Cancelled),
            booking("3", BookingStatus::Pending),
        ];

        assert_eq!(
            Stats::compute(&rooms, &bookings),
            Stats {
                total_rooms: 3,
                available_rooms: 2,
                active_bookings: 2,
                equipment_items: 3,
            }
        );
    }

    #[test]
    fn empty() {
        assert_eq!(Stats::compute(&[], &[]), Stats::default());
    }
}
