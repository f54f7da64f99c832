//! Schedule view: bookings grouped by date, then by room code.

use std::collections::BTreeMap;
use std::sync::Arc;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use roombook_core::{Booking, BookingStatus};

use crate::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomSlots {
    pub room_code: String,
    pub room_name: String,
    pub bookings: Vec<Arc<Booking>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    pub date: String,
    pub rooms: Vec<RoomSlots>,
}

/// Group bookings for display. Dates and room codes sort ascending; inside
/// a room, bookings sort by start time and otherwise keep input order.
pub fn group_by_day(bookings: &[Arc<Booking>]) -> Vec<Day> {
    let mut days: BTreeMap<&str, BTreeMap<&str, Vec<Arc<Booking>>>> = BTreeMap::new();
    for booking in bookings {
        days.entry(booking.date.as_str())
            .or_default()
            .entry(booking.room_code.as_str())
            .or_default()
            .push(Arc::clone(booking));
    }

    days.into_iter()
        .map(|(date, rooms)| Day {
            date: date.to_owned(),
            rooms: rooms
                .into_iter()
                .map(|(code, mut slots)| {
                    slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
                    RoomSlots {
                        room_code: code.to_owned(),
                        room_name: slots
                            .first()
                            .map(|b| b.room_name.clone())
                            .unwrap_or_default(),
                        bookings: slots,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Flatten the grouping into styled lines for a scrolling paragraph.
pub fn schedule_lines(days: &[Day]) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for day in days {
        lines.push(Line::from(Span::styled(
            format!(" {} ", day.date),
            Style::default()
                .fg(theme::ELECTRIC_PURPLE)
                .add_modifier(Modifier::BOLD),
        )));
        for room in &day.rooms {
            lines.push(Line::from(vec![
                Span::styled(format!("   {}", room.room_code), theme::title_style()),
                Span::styled(format!("  {}", room.room_name), theme::table_row()),
            ]));
            for booking in &room.bookings {
                let slot_style = if booking.status == BookingStatus::Cancelled {
                    Style::default()
                        .fg(theme::BORDER_GRAY)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(theme::LIGHT_BLUE)
                };
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("     {}-{}", booking.start_time, booking.end_time),
                        slot_style,
                    ),
                    Span::styled(format!("  {}", booking.organizer), theme::table_row()),
                    Span::styled(
                        format!("  {}", booking.status),
                        Style::default().fg(theme::booking_status_color(booking.status)),
                    ),
                ]));
            }
        }
        lines.push(Line::from(""));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn booking(id: &str, date: &str, code: &str, start: &str) -> Arc<Booking> {
        Arc::new(Booking {
            id: id.into(),
            room_code: code.into(),
            room_name: format!("Room {code}"),
            date: date.into(),
            start_time: start.into(),
            end_time: "23:00".into(),
            status: BookingStatus::Confirmed,
            organizer: "org".into(),
            note: None,
        })
    }

    fn ids(slots: &RoomSlots) -> Vec<&str> {
        slots.bookings.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn groups_by_date_then_room_code() {
        let bookings = vec![
            booking("1", "2025-03-02", "B", "10:00"),
            booking("2", "2025-03-01", "B", "09:00"),
            booking("3", "2025-03-01", "A", "12:00"),
            booking("4", "2025-03-01", "A", "08:00"),
        ];

        let days = group_by_day(&bookings);

        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2025-03-01", "2025-03-02"]);

        let first = &days[0];
        let codes: Vec<&str> = first.rooms.iter().map(|r| r.room_code.as_str()).collect();
        assert_eq!(codes, ["A", "B"]);
        assert_eq!(ids(&first.rooms[0]), ["4", "3"]);
        assert_eq!(first.rooms[0].room_name, "Room A");
        assert_eq!(ids(&days[1].rooms[0]), ["1"]);
    }

    #[test]
    fn equal_start_times_keep_input_order() {
        let bookings = vec![
            booking("x", "2025-03-01", "A", "09:00"),
            booking("y", "2025-03-01", "A", "09:00"),
        ];
        let days = group_by_day(&bookings);
        assert_eq!(ids(&days[0].rooms[0]), ["x", "y"]);
    }

    #[test]
    fn empty_input_has_no_days() {
        assert!(group_by_day(&[]).is_empty());
        assert!(schedule_lines(&[]).is_empty());
    }

    #[test]
    fn lines_cover_headers_and_slots() {
        let days = group_by_day(&[booking("1", "2025-03-01", "A", "09:00")]);
        // date header, room header, one slot, spacer
        assert_eq!(schedule_lines(&days).len(), 4);
    }
}
