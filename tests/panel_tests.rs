mod common;

use common::{default_config, FakeSession, RecordingOpener, TICKET};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use ticketdrop::common::PanelError;
use ticketdrop::progress::{DisplayProgress, ItemKind, RawProgress, TransferStatus};
use ticketdrop::sharing::{
    EmailDelivery, NoticeLevel, NoticeState, PanelStatus, SharingPanel, SharingView,
};

fn panel() -> (Arc<FakeSession>, SharingPanel) {
    let session = FakeSession::new(ItemKind::Single);
    let panel = SharingPanel::new(session.clone(), default_config());
    (session, panel)
}

#[tokio::test]
async fn test_ticket_view_while_listening() {
    let (_session, panel) = panel();

    assert_eq!(panel.status(), PanelStatus::Listening);
    match panel.view() {
        Some(SharingView::Ticket(view)) => {
            assert_eq!(view.ticket, TICKET);
            assert!(!view.copied);
            assert!(!view.broadcast);
        }
        other => panic!("expected ticket view, got {other:?}"),
    }
}

#[tokio::test]
async fn test_no_view_without_ticket() {
    let (session, panel) = panel();
    session.set_ticket(None);
    assert_eq!(panel.view(), None);
}

#[tokio::test]
async fn test_in_progress_view_once_transporting() {
    let (session, panel) = panel();
    session.set_status(TransferStatus::transporting(ItemKind::Single));
    panel.sync();

    assert_eq!(panel.status(), PanelStatus::Sharing);
    assert_eq!(
        panel.view(),
        Some(SharingView::InProgress(DisplayProgress::default()))
    );

    panel.on_progress(RawProgress::new(50, 200, 10.0));
    match panel.view() {
        Some(SharingView::InProgress(progress)) => assert_eq!(progress.percentage, 25.0),
        other => panic!("expected progress view, got {other:?}"),
    }
}

#[tokio::test]
async fn test_completed_wins() {
    let (session, panel) = panel();
    session.set_status(TransferStatus {
        transporting: true,
        completed: true,
        kind: ItemKind::Single,
    });

    assert_eq!(panel.status(), PanelStatus::Completed);
    assert_eq!(panel.view(), Some(SharingView::Completed));
}

#[tokio::test]
async fn test_indicator() {
    let (session, panel) = panel();
    session.connections.store(2, Ordering::SeqCst);
    session.broadcast.store(true, Ordering::SeqCst);

    let indicator = panel.indicator();
    assert_eq!(indicator.file_label.as_deref(), Some("holiday-photos"));
    assert_eq!(indicator.active_connections, 2);
    assert!(indicator.broadcast);
    assert_eq!(indicator.status, PanelStatus::Listening);
}

#[tokio::test(start_paused = true)]
async fn test_broadcast_on_shows_undo_notice() {
    let (session, mut panel) = panel();

    panel.toggle_broadcast();
    assert!(session.is_broadcast_on());
    let notice = panel.broadcast_notice().content().expect("notice shown");
    assert_eq!(notice.level, NoticeLevel::Info);
    assert!(notice.undoable);

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(panel.broadcast_notice().state(), NoticeState::Dismissed);
    assert_eq!(session.toggles.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_broadcast_off_is_silent() {
    let (session, mut panel) = panel();
    session.broadcast.store(true, Ordering::SeqCst);

    panel.toggle_broadcast();
    assert!(!session.is_broadcast_on());
    assert_eq!(panel.broadcast_notice().state(), NoticeState::Hidden);
}

#[tokio::test(start_paused = true)]
async fn test_undo_toggles_back() {
    let (session, mut panel) = panel();

    panel.toggle_broadcast();
    assert!(panel.undo_broadcast());

    assert!(!session.is_broadcast_on());
    assert_eq!(session.toggles.load(Ordering::SeqCst), 2);
    assert_eq!(panel.broadcast_notice().state(), NoticeState::Dismissed);
    assert!(!panel.undo_broadcast(), "undo only once");
}

#[tokio::test(start_paused = true)]
async fn test_undo_after_auto_dismiss_does_nothing() {
    let (session, mut panel) = panel();

    panel.toggle_broadcast();
    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(!panel.undo_broadcast());
    assert!(session.is_broadcast_on());
}

#[tokio::test]
async fn test_copy_marks_ticket_view() {
    let (session, mut panel) = panel();

    panel.copy_ticket().unwrap();
    assert_eq!(session.copies.load(Ordering::SeqCst), 1);
    match panel.view() {
        Some(SharingView::Ticket(view)) => assert!(view.copied),
        other => panic!("expected ticket view, got {other:?}"),
    }
}

#[tokio::test]
async fn test_copy_failure_shows_error_notice() {
    let (session, mut panel) = panel();
    session.fail_copy.store(true, Ordering::SeqCst);

    assert!(matches!(panel.copy_ticket(), Err(PanelError::Clipboard(_))));
    let notice = panel.error_notice().content().expect("error notice");
    assert_eq!(notice.level, NoticeLevel::Error);
}

#[tokio::test]
async fn test_email_dialog_copies_ticket_first() {
    let (session, mut panel) = panel();

    panel.open_email_dialog();
    assert!(panel.email().is_open());
    assert_eq!(session.copies.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_email_rejects_invalid_recipients() {
    let opener = Arc::new(RecordingOpener::default());
    let session = FakeSession::new(ItemKind::Single);
    let mut panel = SharingPanel::new(session, default_config()).with_opener(opener.clone());

    for recipient in ["not-an-email", "", "a@b"] {
        panel.open_email_dialog();
        panel.set_email_recipient(recipient);

        assert!(matches!(
            panel.send_email(),
            Err(PanelError::InvalidRecipient)
        ));
        assert_eq!(
            panel.email().error(),
            Some("Please enter a valid email address")
        );
        assert!(panel.email().is_open());
        // inline only, no notice
        assert!(panel.error_notice().content().is_none());
    }

    assert!(opener.opened().is_empty());
}

#[tokio::test]
async fn test_email_opens_mailto_with_ticket() {
    let opener = Arc::new(RecordingOpener::default());
    let session = FakeSession::new(ItemKind::Single);
    let mut panel = SharingPanel::new(session, default_config()).with_opener(opener.clone());

    panel.open_email_dialog();
    panel.set_email_recipient("a@b.com");

    assert_eq!(panel.send_email().unwrap(), EmailDelivery::Opened);
    assert!(!panel.email().is_open());

    let opened = opener.opened();
    assert_eq!(opened.len(), 1);
    assert!(opened[0].starts_with("mailto:a%40b.com?subject=TicketDrop%20ticket&body="));
    assert!(opened[0].contains(TICKET));
}

#[tokio::test]
async fn test_email_without_opener_navigates() {
    let (_session, mut panel) = panel();
    panel.open_email_dialog();
    panel.set_email_recipient("a@b.com");

    match panel.send_email().unwrap() {
        EmailDelivery::Navigate(uri) => assert!(uri.starts_with("mailto:")),
        other => panic!("expected navigation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_email_opener_failure_is_notice() {
    let session = FakeSession::new(ItemKind::Single);
    let mut panel =
        SharingPanel::new(session, default_config()).with_opener(RecordingOpener::failing());

    panel.open_email_dialog();
    panel.set_email_recipient("a@b.com");

    let err = panel.send_email().unwrap_err();
    assert!(!err.is_input());

    let notice = panel.error_notice().content().expect("error notice");
    assert_eq!(notice.title, "Failed to open email client");
    assert!(notice.description.contains("no mail client"));
    // recipient is kept so the user can retry
    assert_eq!(panel.email().recipient(), "a@b.com");
    assert_eq!(panel.email().error(), None);
}

#[tokio::test]
async fn test_email_needs_ticket() {
    let (session, mut panel) = panel();
    session.set_ticket(None);
    panel.set_email_recipient("a@b.com");
    assert!(matches!(panel.send_email(), Err(PanelError::NoTicket)));
}

#[tokio::test(start_paused = true)]
async fn test_stop_dismisses_broadcast_notice() {
    let (session, mut panel) = panel();
    panel.toggle_broadcast();

    panel.stop_sharing();
    assert_eq!(session.stops.load(Ordering::SeqCst), 1);
    assert_eq!(panel.broadcast_notice().state(), NoticeState::Dismissed);
}
