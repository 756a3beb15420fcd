// Connections – A word grouping game
// Copyright (C) 2023, 2024  Neil Roberts
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use wasm_bindgen::prelude::*;
use web_sys::console;
use super::catalog::Catalog;
use super::game::{ArchiveEntry, Game, Renderer, View};
use super::progress::{ProgressObserver, Status};
use super::session::{Outcome, SubmitResult, MAX_ATTEMPTS};
use rand::SeedableRng;
use rand::rngs::SmallRng;

const PUZZLES_FILENAME: &'static str = "puzzles.json";
const GRID_ID: &'static str = "grid";
const FOUND_GROUPS_ID: &'static str = "found-groups";
const ATTEMPTS_ID: &'static str = "attempts";
const SUBMIT_BUTTON_ID: &'static str = "submit-button";
const RESULT_MESSAGE_ID: &'static str = "result-message";
const HINT_LIST_ID: &'static str = "hint-list";
const ARCHIVE_LIST_ID: &'static str = "archive-list";

const OVERLAYS: [(Page, &'static str); 3] = [
    (Page::Instructions, "instructions-overlay"),
    (Page::Archive, "archive-overlay"),
    (Page::Hints, "hints-overlay"),
];

#[derive(PartialEq, Eq, Copy, Clone)]
enum Page {
    Game,
    Instructions,
    Archive,
    Hints,
}

fn show_error(message: &str) {
    console::log_1(&message.into());

    let Some(window) = web_sys::window()
    else {
        return;
    };

    let Some(document) = window.document()
    else {
        return;
    };

    let Some(message_elem) = document.get_element_by_id("message")
    else {
        return;
    };

    message_elem.set_text_content(Some("An error occurred"));
}

struct Context {
    document: web_sys::HtmlDocument,
    window: web_sys::Window,
    message: web_sys::HtmlElement,
}

impl Context {
    fn new() -> Result<Context, String> {
        let Some(window) = web_sys::window()
        else {
            return Err("failed to get window".to_string());
        };

        let Some(document) = window.document()
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
        else {
            return Err("failed to get document".to_string());
        };

        let Some(message) = document.get_element_by_id("message")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return Err("failed to get message div".to_string());
        };

        Ok(Context {
            document,
            window,
            message,
        })
    }

    fn html_element(&self, id: &str) -> Result<web_sys::HtmlElement, String> {
        self.document.get_element_by_id(id)
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
            .ok_or_else(|| format!("failed to get {}", id))
    }
}

type PromiseClosure = Closure::<dyn FnMut(JsValue)>;
type EventClosure = Closure::<dyn Fn(JsValue)>;

struct Loader {
    context: Context,

    data_response_closure: Option<PromiseClosure>,
    data_content_closure: Option<PromiseClosure>,
    data_error_closure: Option<PromiseClosure>,

    floating_pointer: Option<*mut Loader>,
}

impl Loader {
    fn new(context: Context) -> Loader {
        Loader {
            context,
            data_response_closure: None,
            data_content_closure: None,
            data_error_closure: None,
            floating_pointer: None,
        }
    }

    fn start_floating(self) -> *mut Loader {
        assert!(self.floating_pointer.is_none());

        let floating_pointer = Box::into_raw(Box::new(self));

        unsafe {
            (*floating_pointer).floating_pointer = Some(floating_pointer);
        }

        floating_pointer
    }

    fn stop_floating(&mut self) -> Loader {
        match self.floating_pointer {
            Some(floating_pointer) => unsafe {
                // This should end up destroying the loader and
                // invalidating any closures that it holds
                *Box::from_raw(floating_pointer)
            },
            None => unreachable!(),
        }
    }

    fn queue_data_load(&mut self) {
        let floating_pointer = self.floating_pointer.unwrap();

        let response_closure = PromiseClosure::new(move |v: JsValue| {
            let (content_closure, error_closure) = unsafe {
                (
                    (*floating_pointer).data_content_closure.as_ref().unwrap(),
                    (*floating_pointer).data_error_closure.as_ref().unwrap(),
                )
            };

            let response: web_sys::Response = v.dyn_into().unwrap();
            let promise = match response.text() {
                Ok(p) => p,
                Err(_) => {
                    show_error("Error fetching text from data");
                    unsafe {
                        (*floating_pointer).stop_floating();
                    }
                    return;
                },
            };
            let _ = promise.then2(content_closure, error_closure);
        });

        let content_closure = PromiseClosure::new(move |v| {
            unsafe {
                (*floating_pointer).data_loaded(v);
            }
        });

        let error_closure = PromiseClosure::new(move |_| {
            show_error("Error loading data");
            unsafe {
                (*floating_pointer).stop_floating();
            }
        });

        let request_init = web_sys::RequestInit::new();
        request_init.set_cache(web_sys::RequestCache::NoCache);

        let promise = self.context.window.fetch_with_str_and_init(
            PUZZLES_FILENAME,
            &request_init,
        );

        let _ = promise.then2(&response_closure, &error_closure);

        self.data_response_closure = Some(response_closure);
        self.data_content_closure = Some(content_closure);
        self.data_error_closure = Some(error_closure);
    }

    fn data_loaded(&mut self, data: JsValue) {
        let Some(text) = data.as_string()
        else {
            show_error("Puzzle data is not a string");
            self.stop_floating();
            return;
        };

        match text.parse::<Catalog>() {
            Err(e) => {
                show_error(&format!("{}: {}", PUZZLES_FILENAME, e));
                self.stop_floating();
            },
            Ok(catalog) => self.start_game(catalog),
        }
    }

    fn start_game(&mut self, catalog: Catalog) {
        let Loader { context, .. } = self.stop_floating();

        let chosen_puzzle = get_chosen_puzzle(&context).unwrap_or(1);

        match Connections::new(context, catalog, chosen_puzzle) {
            Ok(connections) => {
                // Leak the main connections object so that it will live
                // as long as the web page
                std::mem::forget(connections);
            },
            Err(e) => show_error(&e),
        }
    }
}

/// Draws each view of the game into the page.
struct Board {
    document: web_sys::HtmlDocument,
    grid: web_sys::HtmlElement,
    found_groups: web_sys::HtmlElement,
    attempts: web_sys::HtmlElement,
    submit_button: web_sys::HtmlElement,
    result_message: web_sys::HtmlElement,
}

impl Board {
    fn new(context: &Context) -> Result<Board, String> {
        Ok(Board {
            document: context.document.clone(),
            grid: context.html_element(GRID_ID)?,
            found_groups: context.html_element(FOUND_GROUPS_ID)?,
            attempts: context.html_element(ATTEMPTS_ID)?,
            submit_button: context.html_element(SUBMIT_BUTTON_ID)?,
            result_message: context.html_element(RESULT_MESSAGE_ID)?,
        })
    }

    fn create_element(
        &self,
        name: &str,
        class: &str,
    ) -> Option<web_sys::Element> {
        let element = self.document.create_element(name).ok()?;
        element.set_class_name(class);
        Some(element)
    }

    fn render_grid(&self, view: &View) {
        clear_element(&self.grid);

        for word in view.words.iter() {
            let class = if view.is_selected(word) {
                "cell selected"
            } else {
                "cell"
            };

            let Some(cell) = self.create_element("div", class)
            else {
                continue;
            };

            let _ = cell.set_attribute("data-word", word);
            set_element_text(&cell, word);

            let _ = self.grid.append_with_node_1(&cell);
        }
    }

    fn render_found_groups(&self, view: &View) {
        clear_element(&self.found_groups);

        for group in view.solved.iter() {
            let class = if group.credited {
                "found-group"
            } else {
                "found-group revealed"
            };

            let Some(bar) = self.create_element("div", class)
            else {
                continue;
            };

            if let Some(title) = self.create_element("div", "found-title") {
                set_element_text(&title, &group.description);
                let _ = bar.append_with_node_1(&title);
            }

            if let Some(words) = self.create_element("div", "found-words") {
                set_element_text(&words, &group.words.join(", "));
                let _ = bar.append_with_node_1(&words);
            }

            let _ = self.found_groups.append_with_node_1(&bar);
        }
    }

    fn render_attempts(&self, view: &View) {
        clear_element(&self.attempts);

        for i in 0..MAX_ATTEMPTS {
            let class = if i < view.attempts_remaining {
                "dot"
            } else {
                "dot used"
            };

            if let Some(dot) = self.create_element("span", class) {
                let _ = self.attempts.append_with_node_1(&dot);
            }
        }
    }

    fn render_message(&self, view: &View) {
        let message = match view.outcome {
            Some(Outcome::Completed) => "Well done!",
            Some(Outcome::Failed) => "Out of attempts",
            None if view.replay => "Replaying this puzzle",
            None => "",
        };

        set_element_text(&self.result_message, message);
    }
}

impl Renderer for Board {
    fn render(&mut self, view: &View) {
        self.render_grid(view);
        self.render_found_groups(view);
        self.render_attempts(view);
        self.render_message(view);

        if view.can_submit {
            let _ = self.submit_button.remove_attribute("disabled");
        } else {
            let _ = self.submit_button.set_attribute("disabled", "");
        }

        if let Some(title) = self.document.get_element_by_id("title") {
            set_element_text(&title, &view.puzzle_name);
        }
    }
}

/// The list of puzzles on the archive page. Each entry has an icon
/// that follows the puzzle’s status.
struct Archive {
    document: web_sys::HtmlDocument,
}

impl Archive {
    fn build(
        context: &Context,
        entries: &[ArchiveEntry],
    ) -> Result<Archive, String> {
        let Some(list) = context.document.get_element_by_id(ARCHIVE_LIST_ID)
        else {
            return Err("failed to get archive list".to_string());
        };

        clear_element(&list);

        for entry in entries.iter() {
            let Ok(li) = context.document.create_element("li")
            else {
                continue;
            };

            li.set_class_name("archive-item");

            let Ok(icon) = context.document.create_element("span")
            else {
                continue;
            };

            icon.set_class_name("icon");
            icon.set_id(&archive_icon_id(entry.index));
            set_element_text(&icon, entry.status.icon());

            let Ok(a) = context.document.create_element("a")
            else {
                continue;
            };

            set_element_text(&a, &entry.name);
            let _ = a.set_attribute("href", &format!("?p={}", entry.index + 1));
            let _ = a.set_attribute("data-puzzle", &entry.index.to_string());

            let _ = li.append_with_node_1(&icon);
            let _ = li.append_with_node_1(&a);
            let _ = list.append_with_node_1(&li);
        }

        Ok(Archive { document: context.document.clone() })
    }
}

impl ProgressObserver for Archive {
    fn progress_changed(&mut self, index: usize, status: Status) {
        if let Some(icon) =
            self.document.get_element_by_id(&archive_icon_id(index))
        {
            set_element_text(&icon, status.icon());
        }
    }
}

fn archive_icon_id(index: usize) -> String {
    format!("archive-icon-{}", index)
}

struct Connections {
    context: Context,
    game: Game<SmallRng>,
    grid: web_sys::HtmlElement,
    closures: Vec<EventClosure>,
}

impl Connections {
    fn new(
        context: Context,
        catalog: Catalog,
        chosen_puzzle: usize,
    ) -> Result<Box<Connections>, String> {
        let grid = context.html_element(GRID_ID)?;
        let board = Board::new(&context)?;

        // The browser’s random number generator is enough to seed it
        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;

        let mut game = Game::new(
            catalog,
            SmallRng::seed_from_u64(seed),
            Box::new(board),
            chosen_puzzle - 1,
        ).map_err(|e| e.to_string())?;

        let archive = Archive::build(&context, &game.archive())?;
        game.subscribe(Box::new(archive));

        let mut connections = Box::new(Connections {
            context,
            game,
            grid,
            closures: Vec::new(),
        });

        connections.create_closures();

        connections.show_game_contents();
        connections.set_page(Page::Game);

        Ok(connections)
    }

    fn create_closure<F>(&mut self, func: F) -> EventClosure
        where F: Fn(&mut Connections, JsValue) + 'static
    {
        let connections_pointer = self as *mut Connections;

        EventClosure::new(move |event: JsValue| {
            let connections = unsafe { &mut *connections_pointer };
            func(connections, event);
        })
    }

    fn listen(
        &mut self,
        ids: &[&str],
        event_name: &str,
        closure: EventClosure,
    ) {
        for id in ids.iter() {
            let Some(target) =
                self.context.document.get_element_by_id(id)
                .and_then(|c| c.dyn_into::<web_sys::EventTarget>().ok())
            else {
                console::log_1(&format!("missing element {}", id).into());
                continue;
            };

            let _ = target.add_event_listener_with_callback(
                event_name,
                closure.as_ref().unchecked_ref(),
            );
        }

        self.closures.push(closure);
    }

    fn create_closures(&mut self) {
        let closure = self.create_closure(|connections, event| {
            if let Ok(event) = event.dyn_into::<web_sys::Event>() {
                connections.handle_grid_click(event);
            }
        });
        self.listen(&[GRID_ID], "click", closure);

        let closure = self.create_closure(|connections, _| {
            connections.handle_submit();
        });
        self.listen(&[SUBMIT_BUTTON_ID], "click", closure);

        let closure = self.create_closure(|connections, _| {
            connections.game.reshuffle();
        });
        self.listen(&["shuffle-button"], "click", closure);

        let closure = self.create_closure(|connections, _| {
            connections.game.clear_selection();
        });
        self.listen(&["deselect-button"], "click", closure);

        let closure = self.create_closure(|connections, _| {
            connections.set_page(Page::Instructions);
        });
        self.listen(&["help-button"], "click", closure);

        let closure = self.create_closure(|connections, _| {
            connections.set_page(Page::Archive);
        });
        self.listen(&["archive-button"], "click", closure);

        let closure = self.create_closure(|connections, _| {
            connections.show_hints();
        });
        self.listen(&["hint-button"], "click", closure);

        let closure = self.create_closure(|connections, _| {
            connections.set_page(Page::Game);
        });
        self.listen(
            &["close-instructions", "close-archive", "close-hints"],
            "click",
            closure,
        );

        // Clicking on the backdrop of an overlay closes it
        let closure = self.create_closure(|connections, event| {
            let Ok(event) = event.dyn_into::<web_sys::Event>()
            else {
                return;
            };

            let Some(target) = event.target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            else {
                return;
            };

            let target_id = target.id();

            if OVERLAYS.iter().any(|&(_, id)| id == target_id) {
                connections.set_page(Page::Game);
            }
        });
        self.listen(
            &OVERLAYS.map(|(_, id)| id),
            "click",
            closure,
        );

        let closure = self.create_closure(|connections, event| {
            if let Ok(event) = event.dyn_into::<web_sys::Event>() {
                connections.handle_archive_click(event);
            }
        });
        self.listen(&[ARCHIVE_LIST_ID], "click", closure);

        let closure = self.create_closure(|connections, event| {
            if let Ok(event) = event.dyn_into::<web_sys::KeyboardEvent>() {
                connections.handle_keydown_event(event);
            }
        });
        let _ = self.context.document.add_event_listener_with_callback(
            "keydown",
            closure.as_ref().unchecked_ref(),
        );
        self.closures.push(closure);
    }

    fn handle_grid_click(&mut self, event: web_sys::Event) {
        let Some(cell) = event.target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|e| e.closest(".cell").ok().flatten())
        else {
            return;
        };

        let Some(word) = cell.get_attribute("data-word")
        else {
            return;
        };

        self.game.toggle_select(&word);
    }

    fn handle_submit(&mut self) {
        match self.game.submit() {
            Some(SubmitResult::Incorrect) | Some(SubmitResult::GameLost) => {
                self.shake_grid();
            },
            Some(SubmitResult::Correct(_)) | Some(SubmitResult::GameWon) |
            None => (),
        }
    }

    fn handle_archive_click(&mut self, event: web_sys::Event) {
        let Some(link) = event.target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|e| e.closest("a[data-puzzle]").ok().flatten())
        else {
            return;
        };

        event.prevent_default();

        let Some(index) = link.get_attribute("data-puzzle")
            .and_then(|s| s.parse::<usize>().ok())
        else {
            return;
        };

        if self.game.load_puzzle(index) {
            self.set_page(Page::Game);
        }
    }

    fn handle_keydown_event(&mut self, event: web_sys::KeyboardEvent) {
        let key = event.key();

        if key == "Enter" {
            self.handle_submit();
        } else if key == "Escape" {
            if !self.game.clear_selection() {
                self.set_page(Page::Game);
            }
        }
    }

    fn shake_grid(&self) {
        let class_list = self.grid.class_list();
        let _ = class_list.remove_1("shake");
        // Reading the layout restarts the animation
        let _ = self.grid.offset_width();
        let _ = class_list.add_1("shake");
    }

    fn show_hints(&self) {
        let Some(hint_list) =
            self.context.document.get_element_by_id(HINT_LIST_ID)
        else {
            return;
        };

        clear_element(&hint_list);

        for description in self.game.hints() {
            if let Ok(li) = self.context.document.create_element("li") {
                set_element_text(&li, description);
                let _ = hint_list.append_with_node_1(&li);
            }
        }

        self.set_page(Page::Hints);
    }

    fn show_game_contents(&self) {
        let _ = self.context.message.style().set_property("display", "none");

        if let Some(content) =
            self.context.document.get_element_by_id("content")
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let _ = content.class_list().remove_1("loading");
        }
    }

    fn set_element_visibility(&self, id: &str, visibility: bool) {
        if let Some(elem) =
            self.context.document.get_element_by_id(id)
            .and_then(|c| c.dyn_into::<web_sys::HtmlElement>().ok())
        {
            let _ = elem.style().set_property(
                "display",
                if visibility { "block" } else { "none" },
            );
        }
    }

    fn set_page(&self, page: Page) {
        for (overlay_page, id) in OVERLAYS.iter() {
            self.set_element_visibility(id, page == *overlay_page);
        }
    }
}

fn clear_element(element: &web_sys::Element) {
    while let Some(child) = element.first_child() {
        let _ = element.remove_child(&child);
    }
}

fn set_element_text(element: &web_sys::Element, text: &str) {
    clear_element(element);

    if let Some(document) = element.owner_document() {
        let text = document.create_text_node(text);
        let _ = element.append_with_node_1(&text);
    }
}

fn get_chosen_puzzle(context: &Context) -> Option<usize> {
    let location = context.document.location()?;
    let search = location.search().ok()?;
    let params = web_sys::UrlSearchParams::new_with_str(&search).ok()?;
    let puzzle_str = params.get("p")?;

    puzzle_str.parse::<usize>().ok().filter(|&n| n >= 1)
}

#[wasm_bindgen]
pub fn init_connections() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let context = match Context::new() {
        Ok(c) => c,
        Err(e) => {
            show_error(&e);
            return;
        }
    };

    let loader = Loader::new(context);

    let floating_pointer = loader.start_floating();

    unsafe {
        (*floating_pointer).queue_data_load();
    }
}
