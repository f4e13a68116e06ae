use std::time::Duration;

use client_core::{
    detail::format_timestamp, IssueDetailView, IssueForm, ListView, QueryAction, QueryState,
    PAGE_SIZE_OPTIONS,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::{
    domain::{IssueId, IssuePriority, IssueStatus, SortDirection, SortField},
    protocol::Issue,
};

use crate::backend_bridge::commands::BackendCommand;
use crate::config::StartupConfig;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;

const DANGER: egui::Color32 = egui::Color32::from_rgb(0xd9, 0x48, 0x48);

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingDelete {
    issue_id: IssueId,
    title: String,
}

enum RowAction {
    Open(Issue),
    Edit(Issue),
    Delete(PendingDelete),
}

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    api_base: String,
    list: ListView,
    search_input: String,
    assignee_input: String,
    selected: Option<Issue>,
    form: Option<IssueForm>,
    pending_delete: Option<PendingDelete>,
    alert: Option<UiError>,
    status: String,
}

impl DesktopGuiApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            api_base: startup.api_base,
            list: ListView::default(),
            search_input: String::new(),
            assignee_input: String::new(),
            selected: None,
            form: None,
            pending_delete: None,
            alert: None,
            status: String::new(),
        };
        app.send(BackendCommand::Refresh);
        app
    }

    fn send(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status)
    }

    fn query(&mut self, action: QueryAction) {
        self.send(BackendCommand::Query(action));
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ListUpdated(view) => {
                    if let Some(selected) = &mut self.selected {
                        if let Some(fresh) = view.items.iter().find(|it| it.id == selected.id) {
                            *selected = fresh.clone();
                        }
                    }
                    self.list = view;
                    self.status.clear();
                }
                UiEvent::IssueSaved(issue) => {
                    self.form = None;
                    if self.selected.as_ref().is_some_and(|it| it.id == issue.id) {
                        self.selected = Some(issue.clone());
                    }
                    self.status = format!("Saved issue #{}", issue.id);
                }
                UiEvent::IssueDeleted(issue_id) => {
                    if self.selected.as_ref().is_some_and(|it| it.id == issue_id) {
                        self.selected = None;
                    }
                    self.status = format!("Deleted issue #{issue_id}");
                }
                UiEvent::Error(err) => {
                    tracing::error!(
                        context = ?err.context(),
                        detail = err.message(),
                        "{}",
                        err.headline()
                    );
                    if err.context() == UiErrorContext::SaveIssue {
                        if let Some(form) = &mut self.form {
                            form.save_failed();
                        }
                    }
                    self.alert = Some(err);
                }
            }
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(ctx.style().visuals.panel_fill)
                    .inner_margin(egui::Margin::symmetric(16, 12)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new("Issue Tracker").strong().size(22.0));
                        ui.label(
                            egui::RichText::new(
                                "Search, filter, sort, create, edit and delete issues.",
                            )
                            .weak(),
                        );
                    });
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(egui::RichText::new(&self.api_base).monospace().weak());
                    });
                });
            });
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        card_frame(ui).show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                let search = ui.add(
                    egui::TextEdit::singleline(&mut self.search_input)
                        .hint_text("Search title")
                        .desired_width(220.0),
                );
                let assignee = ui.add(
                    egui::TextEdit::singleline(&mut self.assignee_input)
                        .hint_text("Search assignee")
                        .desired_width(160.0),
                );
                let enter_pressed = (search.lost_focus() || assignee.lost_focus())
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let mut status = self.list.query.status();
                let status_options: Vec<Option<IssueStatus>> =
                    std::iter::once(None).chain(IssueStatus::ALL.map(Some)).collect();
                choice_combo(ui, "status_filter", &mut status, &status_options, |it| {
                    it.map_or("All status", IssueStatus::as_str)
                });
                if status != self.list.query.status() {
                    self.query(QueryAction::SetStatus(status));
                }

                let mut priority = self.list.query.priority();
                let priority_options: Vec<Option<IssuePriority>> =
                    std::iter::once(None).chain(IssuePriority::ALL.map(Some)).collect();
                choice_combo(ui, "priority_filter", &mut priority, &priority_options, |it| {
                    it.map_or("All priority", IssuePriority::as_str)
                });
                if priority != self.list.query.priority() {
                    self.query(QueryAction::SetPriority(priority));
                }

                ui.separator();
                if ui.button("Reset").clicked() {
                    self.search_input.clear();
                    self.assignee_input.clear();
                    self.query(QueryAction::Reset);
                }
                if ui.button("Search").clicked() || enter_pressed {
                    self.query(QueryAction::SubmitSearch {
                        search: self.search_input.clone(),
                        assignee: self.assignee_input.clone(),
                    });
                }
                if ui.button("Create Issue").clicked() {
                    self.form = Some(IssueForm::create());
                }
            });
        });
    }

    fn show_issue_table(&mut self, ui: &mut egui::Ui) {
        let mut action = None;
        let mut toggled = None;

        card_frame(ui).show(ui, |ui| {
            egui::ScrollArea::both()
                .id_salt("issues_table_scroll")
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    egui::Grid::new("issues_table")
                        .num_columns(SortField::COLUMNS.len() + 1)
                        .striped(true)
                        .spacing([18.0, 6.0])
                        .show(ui, |ui| {
                            for field in SortField::COLUMNS {
                                let text = sort_header_label(field, &self.list.query);
                                let header = egui::Button::new(egui::RichText::new(text).strong())
                                    .frame(false);
                                if ui.add(header).clicked() {
                                    toggled = Some(field);
                                }
                            }
                            ui.label(egui::RichText::new("actions").strong());
                            ui.end_row();

                            for issue in &self.list.items {
                                let mut opened = false;
                                for cell in row_cells(issue) {
                                    let label = egui::Label::new(cell).sense(egui::Sense::click());
                                    opened |= ui.add(label).clicked();
                                }
                                ui.horizontal(|ui| {
                                    if ui.button("Edit").clicked() {
                                        action = Some(RowAction::Edit(issue.clone()));
                                    }
                                    let delete = egui::Button::new(
                                        egui::RichText::new("Delete").color(DANGER),
                                    );
                                    if ui.add(delete).clicked() {
                                        action = Some(RowAction::Delete(PendingDelete {
                                            issue_id: issue.id,
                                            title: issue.title.clone(),
                                        }));
                                    }
                                });
                                if opened && action.is_none() {
                                    action = Some(RowAction::Open(issue.clone()));
                                }
                                ui.end_row();
                            }
                        });

                    if self.list.items.is_empty() {
                        ui.add_space(8.0);
                        ui.label(egui::RichText::new("No issues found.").weak());
                    }
                });
        });

        if let Some(field) = toggled {
            self.query(QueryAction::ToggleSort(field));
        }
        match action {
            Some(RowAction::Open(issue)) => self.selected = Some(issue),
            Some(RowAction::Edit(issue)) => self.form = Some(IssueForm::edit(&issue)),
            Some(RowAction::Delete(pending)) => self.pending_delete = Some(pending),
            None => {}
        }
    }

    fn show_pagination(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("pagination")
            .frame(
                egui::Frame::new()
                    .fill(ctx.style().visuals.panel_fill)
                    .inner_margin(egui::Margin::symmetric(16, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(self.list.can_go_previous(), egui::Button::new("Prev"))
                        .clicked()
                    {
                        self.query(QueryAction::PreviousPage);
                    }
                    ui.label(page_label(&self.list));
                    if ui
                        .add_enabled(self.list.can_go_next(), egui::Button::new("Next"))
                        .clicked()
                    {
                        self.query(QueryAction::NextPage);
                    }
                    ui.label(egui::RichText::new(format!("{} issues", self.list.total)).weak());
                    if !self.status.is_empty() {
                        ui.separator();
                        ui.label(egui::RichText::new(&self.status).weak());
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let mut page_size = self.list.query.page_size();
                        choice_combo(ui, "page_size", &mut page_size, &PAGE_SIZE_OPTIONS, |it| {
                            it.to_string()
                        });
                        ui.label(egui::RichText::new("Page size:").weak());
                        if page_size != self.list.query.page_size() {
                            self.query(QueryAction::SetPageSize(page_size));
                        }
                    });
                });
            });
    }

    fn show_detail_panel(&mut self, ctx: &egui::Context) {
        let Some(issue) = &self.selected else {
            return;
        };
        let detail = IssueDetailView::from_issue(issue);
        let mut close = false;

        egui::SidePanel::right("issue_detail")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new(&detail.heading).strong().size(18.0));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        close = ui.button("Close").clicked();
                    });
                });
                ui.separator();

                egui::ScrollArea::vertical()
                    .id_salt("issue_detail_scroll")
                    .show(ui, |ui| {
                        egui::Grid::new("issue_detail_rows")
                            .num_columns(2)
                            .spacing([12.0, 6.0])
                            .show(ui, |ui| {
                                for (label, value) in &detail.rows {
                                    ui.label(egui::RichText::new(format!("{label}:")).strong());
                                    ui.label(value);
                                    ui.end_row();
                                }
                            });

                        ui.add_space(10.0);
                        ui.label(egui::RichText::new("Description").strong());
                        ui.label(&detail.description);

                        ui.add_space(10.0);
                        ui.label(egui::RichText::new("Raw JSON").strong());
                        card_frame(ui).show(ui, |ui| {
                            ui.label(egui::RichText::new(&detail.raw_json).monospace().small());
                        });
                    });
            });

        if close {
            self.selected = None;
        }
    }

    fn show_form_modal(&mut self, ctx: &egui::Context) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let mut save = false;
        let mut cancel = false;

        let modal = egui::Modal::new(egui::Id::new("issue_form_modal")).show(ctx, |ui| {
            ui.set_width(440.0);
            ui.horizontal(|ui| {
                ui.heading(form.draft.heading());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if form.is_saving() { "Saving..." } else { "Save" };
                    save = ui
                        .add_enabled(!form.is_saving(), egui::Button::new(label))
                        .clicked();
                    cancel = ui.button("Cancel").clicked();
                });
            });
            ui.add_space(8.0);

            ui.label("Title");
            ui.add(egui::TextEdit::singleline(&mut form.draft.title).desired_width(f32::INFINITY));
            ui.label("Description");
            ui.add(
                egui::TextEdit::multiline(&mut form.draft.description)
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );
            ui.horizontal(|ui| {
                ui.label("Status");
                choice_combo(
                    ui,
                    "form_status",
                    &mut form.draft.status,
                    &IssueStatus::ALL,
                    IssueStatus::as_str,
                );
                ui.add_space(12.0);
                ui.label("Priority");
                choice_combo(
                    ui,
                    "form_priority",
                    &mut form.draft.priority,
                    &IssuePriority::ALL,
                    IssuePriority::as_str,
                );
            });
            ui.label("Assignee");
            ui.add(
                egui::TextEdit::singleline(&mut form.draft.assignee).desired_width(f32::INFINITY),
            );
        });

        if cancel || modal.should_close() {
            self.form = None;
            return;
        }
        if save {
            if let Some(draft) = form.begin_save() {
                let queued = dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::SaveIssue { draft },
                    &mut self.status,
                );
                if !queued {
                    form.save_failed();
                }
            }
        }
    }

    fn show_delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(pending) = &self.pending_delete else {
            return;
        };
        let mut confirmed = false;
        let mut dismissed = false;

        let modal = egui::Modal::new(egui::Id::new("delete_confirmation")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.label(delete_prompt(pending.issue_id, &pending.title));
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                dismissed = ui.button("Cancel").clicked();
                confirmed = ui
                    .add(egui::Button::new(egui::RichText::new("Delete").color(DANGER)))
                    .clicked();
            });
        });

        if confirmed {
            let issue_id = pending.issue_id;
            self.pending_delete = None;
            self.send(BackendCommand::DeleteIssue { issue_id });
        } else if dismissed || modal.should_close() {
            self.pending_delete = None;
        }
    }

    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = &self.alert else {
            return;
        };
        let mut dismissed = false;

        let modal = egui::Modal::new(egui::Id::new("error_alert")).show(ctx, |ui| {
            ui.set_width(380.0);
            ui.label(egui::RichText::new(alert.headline()).strong().color(DANGER));
            ui.add_space(4.0);
            ui.label(egui::RichText::new(alert.message()).small().weak());
            ui.add_space(8.0);
            dismissed = ui.button("OK").clicked();
        });

        if dismissed || modal.should_close() {
            self.alert = None;
        }
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_pagination(ctx);
        self.show_detail_panel(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_controls(ui);
            ui.add_space(8.0);
            self.show_issue_table(ui);
        });

        self.show_form_modal(ctx);
        self.show_delete_confirmation(ctx);
        self.show_alert(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

fn card_frame(ui: &egui::Ui) -> egui::Frame {
    egui::Frame::new()
        .fill(ui.visuals().faint_bg_color)
        .stroke(ui.visuals().widgets.noninteractive.bg_stroke)
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(egui::Margin::symmetric(12, 10))
}

fn choice_combo<T, L>(
    ui: &mut egui::Ui,
    id: &str,
    value: &mut T,
    options: &[T],
    label: impl Fn(T) -> L,
) where
    T: Copy + PartialEq,
    L: Into<egui::WidgetText>,
{
    egui::ComboBox::from_id_salt(id)
        .selected_text(label(*value))
        .show_ui(ui, |ui| {
            for option in options {
                ui.selectable_value(value, *option, label(*option));
            }
        });
}

fn sort_header_label(field: SortField, query: &QueryState) -> String {
    if query.sort_by() != field {
        return field.as_str().to_string();
    }
    let marker = match query.sort_dir() {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    };
    format!("{} {marker}", field.as_str())
}

fn row_cells(issue: &Issue) -> [String; 6] {
    [
        issue.id.to_string(),
        issue.title.clone(),
        issue.status.to_string(),
        issue.priority.to_string(),
        issue.assignee.clone().unwrap_or_default(),
        format_timestamp(&issue.updated_at),
    ]
}

fn page_label(view: &ListView) -> String {
    format!("Page {} / {}", view.query.page(), view.pages())
}

fn delete_prompt(issue_id: IssueId, title: &str) -> String {
    format!("Delete issue #{issue_id} - \"{title}\" ?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn header_marks_only_the_active_sort_column() {
        let mut query = QueryState::default();
        assert_eq!(sort_header_label(SortField::UpdatedAt, &query), "updatedAt ▼");
        assert_eq!(sort_header_label(SortField::Title, &query), "title");

        query.apply(QueryAction::ToggleSort(SortField::Title), 0);
        assert_eq!(sort_header_label(SortField::Title, &query), "title ▲");
    }

    #[test]
    fn labels_match_list_and_delete_wording() {
        assert_eq!(page_label(&ListView::default()), "Page 1 / 1");
        assert_eq!(
            delete_prompt(IssueId(4), "Crash on save"),
            "Delete issue #4 - \"Crash on save\" ?"
        );
    }

    #[test]
    fn startup_requests_the_first_page() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (_ui_tx, ui_rx) = bounded(4);
        let _app = DesktopGuiApp::new(cmd_tx, ui_rx, StartupConfig::default());
        assert_eq!(cmd_rx.try_recv().expect("command"), BackendCommand::Refresh);
    }

    #[test]
    fn save_failure_reenables_the_form_and_raises_alert() {
        let (cmd_tx, _cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(4);
        let mut app = DesktopGuiApp::new(cmd_tx, ui_rx, StartupConfig::default());
        let mut form = IssueForm::create();
        form.begin_save();
        app.form = Some(form);

        ui_tx
            .send(UiEvent::Error(UiError::from_message(
                UiErrorContext::SaveIssue,
                "server returned 422",
            )))
            .expect("send");
        app.process_ui_events();

        assert!(!app.form.as_ref().expect("form stays open").is_saving());
        assert_eq!(
            app.alert.as_ref().map(UiError::headline),
            Some("Failed to save issue")
        );
    }
}
