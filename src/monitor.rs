use crate::{
    aggregator,
    capture::{CaptureSocket, FrameMeta, MAX_FRAME_SIZE},
    classify::{self, FilterState, Verdict},
    cli::RateUnit,
    config::Config,
    error::Result,
    facility::{FacilityCoordinator, IFACE_STATS_FACILITY},
    input::InputEvent,
    logger::SnapshotLogger,
    platform::{PromiscControl, SystemTable},
    registry::InterfaceRegistry,
    signal::SignalFlags,
    view::{ScrollDirection, ViewWindow},
};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Seconds between windowed-rate recomputations.
const RATE_TICK_SECS: u64 = 5;
/// Repaint cadence when no update interval is configured.
const DEFAULT_UPDATE_DELAY: Duration = Duration::from_millis(100);
/// Upper bound on one bounded wait for a packet or a key.
const POLL_TIMEOUT: Duration = Duration::from_millis(50);

/// Runs the interface statistics facility to completion.
///
/// Lifecycle is Starting -> Running -> Draining -> Stopped: resources are
/// acquired in order (facility marker, registry, promiscuous/instance
/// state, log, signal handlers, socket, terminal) and every failure or
/// exit unwinds what was already acquired, in reverse. The marker is
/// removed on all paths once acquired.
pub fn run_monitor(
    config: &Config,
    table: &dyn SystemTable,
    promisc_ctl: &mut dyn PromiscControl,
    state_dir: PathBuf,
    log_path: &str,
) -> Result<()> {
    let coordinator = FacilityCoordinator::new(state_dir)?;
    coordinator.acquire(IFACE_STATS_FACILITY)?;

    let result = run_acquired(&coordinator, config, table, promisc_ctl, log_path);

    coordinator.release(IFACE_STATS_FACILITY);
    result
}

fn run_acquired(
    coordinator: &FacilityCoordinator,
    config: &Config,
    table: &dyn SystemTable,
    promisc_ctl: &mut dyn PromiscControl,
    log_path: &str,
) -> Result<()> {
    let mut registry = InterfaceRegistry::discover(table)?;

    if config.promiscuous {
        coordinator.enable_promiscuous_if_first(&registry.names(), promisc_ctl)?;
    }
    coordinator.adjust_instance_count(1)?;

    let result = run_counted(config, table, &mut registry, log_path);

    if config.promiscuous {
        let _ = coordinator.disable_promiscuous_if_last(promisc_ctl);
    }
    let _ = coordinator.adjust_instance_count(-1);
    result
}

fn run_counted(
    config: &Config,
    table: &dyn SystemTable,
    registry: &mut InterfaceRegistry,
    log_path: &str,
) -> Result<()> {
    // A log that cannot be opened silently disables logging for the
    // session; capture continues.
    let mut logger = if config.logging {
        match SnapshotLogger::open(log_path) {
            Ok(mut logger) => {
                let _ =
                    logger.write_line("******** Interface statistics started ********");
                Some(logger)
            }
            Err(_) => None,
        }
    } else {
        None
    };

    let signals = SignalFlags::install()?;
    let socket = CaptureSocket::open()?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    event_loop(
        &mut terminal,
        config,
        table,
        registry,
        &socket,
        &signals,
        logger.as_mut(),
    )
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: &Config,
    table: &dyn SystemTable,
    registry: &mut InterfaceRegistry,
    socket: &CaptureSocket,
    signals: &SignalFlags,
    mut logger: Option<&mut SnapshotLogger>,
) -> Result<()> {
    let unit = config.get_activity_unit();
    let filter = FilterState::default();
    let rate_period = Duration::from_secs(RATE_TICK_SECS);
    let log_period = Duration::from_secs(config.log_interval.max(1));
    let update_interval = Duration::from_secs(config.update_interval);

    let size = terminal.size()?;
    let mut view = ViewWindow::prepare(registry.len(), viewport_height(size.height));

    let mut buf = vec![0u8; MAX_FRAME_SIZE];
    let mut fatal = None;
    let stat_begin = Instant::now();
    let mut rate_tick = stat_begin;
    let mut log_tick = stat_begin;
    let mut last_paint = stat_begin;
    let mut dirty = false;
    let mut exit = false;

    terminal.draw(|frame| {
        draw_table(frame, registry, &view, unit, stat_begin.elapsed().as_secs());
    })?;

    while !exit {
        let now = Instant::now();

        // Rate tick: windowed average over the actual elapsed time,
        // which may exceed the nominal period under load.
        if now.duration_since(rate_tick) >= rate_period {
            let elapsed = now.duration_since(rate_tick).as_secs_f64();
            let (first, last) = (view.first(), view.last());
            aggregator::refresh_rates(&mut registry.entries_mut()[first..=last], unit, elapsed);
            rate_tick = now;
            dirty = true;
        }

        if let Some(log) = logger.as_deref_mut() {
            if now.duration_since(log_tick) >= log_period {
                let _ = log.write_snapshot(registry.entries(), unit, stat_begin.elapsed().as_secs());
                log_tick = now;
            }
        }

        let paint_period = if update_interval.is_zero() {
            DEFAULT_UPDATE_DELAY
        } else {
            update_interval
        };
        if dirty && now.duration_since(last_paint) >= paint_period {
            terminal.draw(|frame| {
                draw_table(frame, registry, &view, unit, stat_begin.elapsed().as_secs());
            })?;
            last_paint = now;
            dirty = false;
        }

        // Rotation request, raised asynchronously but acted on only
        // here, never mid-write.
        if signals.take_rotate() {
            if let Some(log) = logger.as_deref_mut() {
                let _ = log.rotate();
            }
        }

        if config.timeout_minutes != 0
            && stat_begin.elapsed().as_secs() / 60 >= config.timeout_minutes
        {
            exit = true;
        }
        if signals.shutdown_requested() {
            exit = true;
        }
        if exit {
            break;
        }

        // Socket-level failures end the loop but still drain below.
        let wait = match socket.wait(POLL_TIMEOUT) {
            Ok(wait) => wait,
            Err(err) => {
                fatal = Some(err);
                break;
            }
        };

        if wait.input || event::poll(Duration::ZERO)? {
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                        match InputEvent::from_key_event(key_event) {
                            InputEvent::ScrollTowardTail => {
                                if view
                                    .scroll_line(ScrollDirection::TowardTail, registry.len())
                                    .is_some()
                                {
                                    dirty = true;
                                }
                            }
                            InputEvent::ScrollTowardHead => {
                                if view
                                    .scroll_line(ScrollDirection::TowardHead, registry.len())
                                    .is_some()
                                {
                                    dirty = true;
                                }
                            }
                            InputEvent::PageTowardTail => {
                                if view.scroll_page(ScrollDirection::TowardTail, registry.len()) {
                                    dirty = true;
                                }
                            }
                            InputEvent::PageTowardHead => {
                                if view.scroll_page(ScrollDirection::TowardHead, registry.len()) {
                                    dirty = true;
                                }
                            }
                            InputEvent::RedrawScreen => {
                                terminal.clear()?;
                                dirty = true;
                            }
                            InputEvent::Quit => exit = true,
                            InputEvent::Select | InputEvent::Unknown => {}
                        }
                    }
                    Event::Resize(_, height) => {
                        view = ViewWindow::prepare(registry.len(), viewport_height(height));
                        dirty = true;
                    }
                    _ => {}
                }
            }
        }

        if wait.packet {
            match socket.recv(&mut buf) {
                Ok(Some((bytes, meta))) => {
                    if process_frame(registry, table, &mut view, &filter, &buf[..bytes], &meta) {
                        dirty = true;
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    fatal = Some(err);
                    break;
                }
            }
        }
    }

    // Draining: final snapshot before the counters go away, on the
    // error path too.
    if let Some(log) = logger.as_deref_mut() {
        let _ = log.write_snapshot(registry.entries(), unit, stat_begin.elapsed().as_secs());
        let _ = log.write_line("******** Interface statistics stopped ********");
    }

    match fatal {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Routes one received frame: classify, resolve the owning interface,
/// update its counters. Returns whether the visible table changed.
/// Unresolvable interfaces and rejected frames are absorbed silently.
fn process_frame(
    registry: &mut InterfaceRegistry,
    table: &dyn SystemTable,
    view: &mut ViewWindow,
    filter: &FilterState,
    frame: &[u8],
    meta: &FrameMeta,
) -> bool {
    if frame.is_empty() {
        return false;
    }

    let classification = classify::classify(frame, meta, filter);
    if classification.verdict == Verdict::Rejected {
        return false;
    }
    let checksum_ok = classification.verdict != Verdict::ChecksumError;

    let len_before = registry.len();
    let Some(entry) = registry.resolve(meta.if_index, table) else {
        return false;
    };
    let display_index = entry.display_index;
    let repaint = aggregator::on_packet(
        entry,
        frame.len() as u64,
        classification.protocol,
        checksum_ok,
    );

    if registry.len() > len_before {
        view.note_len(registry.len());
    }

    repaint && view.is_visible(display_index)
}

/// Rows available for interface entries: the frame minus the table
/// border, the header row and the footer line.
fn viewport_height(terminal_height: u16) -> usize {
    usize::from(terminal_height.saturating_sub(4)).max(1)
}

fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours}:{minutes:02}:{seconds:02}")
}

fn draw_table(
    frame: &mut Frame,
    registry: &InterfaceRegistry,
    view: &ViewWindow,
    unit: RateUnit,
    elapsed_secs: u64,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let header = Row::new(vec![
        "Iface", "Total", "IPv4", "IPv6", "NonIP", "BadIP", "Activity",
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let mut rows = Vec::new();
    for slot in view.first()..=view.last() {
        let Some(entry) = registry.get(slot) else {
            break;
        };
        if !view.is_visible(entry.display_index) {
            continue;
        }
        rows.push(Row::new(vec![
            entry.name.clone(),
            entry.total.to_string(),
            entry.ipv4_total.to_string(),
            entry.ipv6_total.to_string(),
            entry.non_ip_total.to_string(),
            entry.bad_checksum_total.to_string(),
            format!("{:10.2} {}", entry.current_rate, unit.label()),
        ]));
    }

    let widths = [
        Constraint::Length(14),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(9),
        Constraint::Length(20),
    ];
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Interface Statistics ")
            .title_bottom(" Total, IPv4, IPv6, NonIP and BadIP are packet counts "),
    );
    frame.render_widget(table, chunks[0]);

    let footer = format!(
        " Elapsed: {}   Up/Down scroll  PgUp/PgDn page  L redraw  Q quit ",
        format_elapsed(elapsed_secs)
    );
    frame.render_widget(
        Paragraph::new(footer).style(Style::default().fg(Color::DarkGray)),
        chunks[1],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::LinkProtocol;
    use crate::platform::fake::FakeTable;

    fn meta_for(if_index: u32, protocol: LinkProtocol) -> FrameMeta {
        FrameMeta {
            if_index,
            protocol,
            ethertype: match protocol {
                LinkProtocol::Ipv4 => 0x0800,
                LinkProtocol::Ipv6 => 0x86DD,
                LinkProtocol::Other => 0x0806,
            },
            hatype: 0xFFFE,
        }
    }

    fn setup() -> (FakeTable, InterfaceRegistry, ViewWindow) {
        let table = FakeTable::new(&[("lo", 1, true), ("eth0", 2, true)]);
        let registry = InterfaceRegistry::discover(&table).unwrap();
        let view = ViewWindow::prepare(registry.len(), 10);
        (table, registry, view)
    }

    #[test]
    fn test_process_frame_counts_non_ip() {
        let (table, mut registry, mut view) = setup();
        let frame = [0u8; 28];

        let repaint = process_frame(
            &mut registry,
            &table,
            &mut view,
            &FilterState::default(),
            &frame,
            &meta_for(2, LinkProtocol::Other),
        );

        assert!(repaint);
        let entry = registry.entries().iter().find(|e| e.name == "eth0").unwrap();
        assert_eq!(entry.total, 1);
        assert_eq!(entry.non_ip_total, 1);
        assert_eq!(entry.span_bytes, 28);
    }

    #[test]
    fn test_process_frame_drops_unresolvable_interface() {
        let (table, mut registry, mut view) = setup();
        let len = registry.len();
        let frame = [0u8; 28];

        let repaint = process_frame(
            &mut registry,
            &table,
            &mut view,
            &FilterState::default(),
            &frame,
            &meta_for(99, LinkProtocol::Other),
        );

        assert!(!repaint);
        assert_eq!(registry.len(), len);
    }

    #[test]
    fn test_process_frame_grows_registry_and_view() {
        let (mut table, mut registry, mut view) = setup();
        table.add_unlisted("tun0", 7);
        let frame = [0u8; 28];

        process_frame(
            &mut registry,
            &table,
            &mut view,
            &FilterState::default(),
            &frame,
            &meta_for(7, LinkProtocol::Other),
        );

        assert_eq!(registry.len(), 3);
        assert_eq!(view.last(), 2);
        assert!(registry.entries().iter().any(|e| e.name == "tun0"));
    }

    #[test]
    fn test_process_frame_empty_and_rejected() {
        let (table, mut registry, mut view) = setup();

        let empty: [u8; 0] = [];
        assert!(!process_frame(
            &mut registry,
            &table,
            &mut view,
            &FilterState::default(),
            &empty,
            &meta_for(2, LinkProtocol::Other),
        ));

        // 8 bytes cannot hold an IPv4 header
        let short = [0u8; 8];
        assert!(!process_frame(
            &mut registry,
            &table,
            &mut view,
            &FilterState::default(),
            &short,
            &meta_for(2, LinkProtocol::Ipv4),
        ));
        assert_eq!(registry.entries()[1].total, 0);
    }

    #[test]
    fn test_offscreen_update_requests_no_repaint() {
        let table = FakeTable::new(&[
            ("if0", 1, true),
            ("if1", 2, true),
            ("if2", 3, true),
            ("if3", 4, true),
        ]);
        let mut registry = InterfaceRegistry::discover(&table).unwrap();
        // two visible rows; if2/if3 are below the fold
        let mut view = ViewWindow::prepare(registry.len(), 2);
        let frame = [0u8; 28];

        let repaint = process_frame(
            &mut registry,
            &table,
            &mut view,
            &FilterState::default(),
            &frame,
            &meta_for(4, LinkProtocol::Other),
        );

        assert!(!repaint);
        assert_eq!(registry.entries()[3].total, 1);
    }

    #[test]
    fn test_viewport_height_floor() {
        assert_eq!(viewport_height(24), 20);
        assert_eq!(viewport_height(5), 1);
        assert_eq!(viewport_height(0), 1);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0), "0:00:00");
        assert_eq!(format_elapsed(61), "0:01:01");
        assert_eq!(format_elapsed(3723), "1:02:03");
    }
}
