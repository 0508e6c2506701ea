use crate::{
    maud_conveniences::{simple_form_element, title},
    state::RollcallState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<RollcallState>) -> Markup {
    state.render(html! {
        div class="bg-gray-800 p-8 rounded shadow-md max-w-md w-full flex flex-col space-y-8" {
            h1 class="text-2xl font-semibold text-center" {
                "Rollcall"
            }

            div class="flex flex-row space-x-4 justify-center" {
                a href="/attendance" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {
                    "Today's Attendance"
                }
                a href="/students" class="bg-slate-600 hover:bg-slate-800 font-bold py-2 px-4 rounded" {
                    "View Students"
                }
            }

            div {
                (title("Register a Student"))
                form method="post" action="/register" {
                    (simple_form_element("name", "Name", true))
                    (simple_form_element("roll_number", "Roll Number", true))
                    (simple_form_element("fingerprint_id", "Fingerprint ID", true))
                    button type="submit" class="bg-blue-500 hover:bg-blue-700 font-bold py-2 px-4 rounded focus:outline-none focus:shadow-outline" {
                        "Register"
                    }
                }
            }
        }
    })
}
