mod labels;
mod schemes;
mod storage;
mod stores;
mod svg_plan;
mod yew_app;

fn main() {
    yew::Renderer::<yew_app::App>::new().render();
}
