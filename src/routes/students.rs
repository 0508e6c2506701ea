use crate::{
    data::student::Student,
    error::RollcallResult,
    maud_conveniences::{escape, render_table},
    state::RollcallState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_students(State(state): State<RollcallState>) -> RollcallResult<Markup> {
    let students = Student::list_all(&*state).await?;

    Ok(state.render(html! {
        div class="mx-auto bg-gray-800 p-8 rounded shadow-md max-w-4xl w-full" {
            (render_table(
                "Students",
                ["Roll Number", "Name", "Fingerprint ID"],
                students
                    .into_iter()
                    .map(|student| {
                        [
                            escape(student.roll_number),
                            escape(student.name),
                            escape(student.fingerprint_id),
                        ]
                    })
                    .collect(),
            ))
        }
    }))
}
